//! Page image loading and measurement
//!
//! The natural size is only known once the browser has decoded the image.
//! Until then (and after a load error) it is reported as `0 x 0`, which the
//! coordinate transform treats as the identity passthrough.

use redaction_types::{DisplayPoint, DisplaySize, NaturalSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

/// Intrinsic pixel size of the decoded image
pub fn natural_size(image: &HtmlImageElement) -> NaturalSize {
    NaturalSize::new(image.natural_width() as f64, image.natural_height() as f64)
}

/// Rendered size of the image on screen
pub fn display_size(image: &HtmlImageElement) -> DisplaySize {
    let rect = image.get_bounding_client_rect();
    DisplaySize::new(rect.width(), rect.height())
}

/// Convert viewport coordinates of a pointer event into image-relative ones
pub fn to_image_point(image: &HtmlImageElement, client_x: f64, client_y: f64) -> DisplayPoint {
    let rect = image.get_bounding_client_rect();
    DisplayPoint::new(client_x - rect.left(), client_y - rect.top())
}

/// Point `image` at `url`. Cross-origin images are requested anonymously so
/// the server's CORS headers apply.
pub fn load_image(image: &HtmlImageElement, url: &str) {
    image.set_cross_origin(Some("anonymous"));
    image.set_src(url);
}

/// Wait for the current image source to finish loading.
///
/// Resolves with the natural size on `load`. On `error` the size is `0 x 0`
/// and an error is returned.
pub async fn wait_for_image(image: &HtmlImageElement) -> Result<NaturalSize, JsValue> {
    if image.complete() && image.natural_width() > 0 {
        return Ok(natural_size(image));
    }

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    let result = JsFuture::from(promise).await;

    image.set_onload(None);
    image.set_onerror(None);

    match result {
        Ok(_) => Ok(natural_size(image)),
        Err(_) => Err(JsValue::from_str(&format!(
            "Failed to load document image: {}",
            image.src()
        ))),
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn new_image() -> HtmlImageElement {
        HtmlImageElement::new().unwrap()
    }

    #[wasm_bindgen_test]
    fn test_unloaded_image_is_degenerate() {
        let image = new_image();
        assert!(natural_size(&image).is_degenerate());
    }

    #[wasm_bindgen_test]
    async fn test_broken_image_reports_error() {
        let image = new_image();
        load_image(&image, "data:image/png;base64,not-an-image");
        assert!(wait_for_image(&image).await.is_err());
        assert!(natural_size(&image).is_degenerate());
    }

    #[wasm_bindgen_test]
    async fn test_loaded_image_has_natural_size() {
        // 1x1 transparent GIF
        let image = new_image();
        load_image(
            &image,
            "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7",
        );
        let size = wait_for_image(&image).await.unwrap();
        assert_eq!((size.width, size.height), (1.0, 1.0));
    }
}
