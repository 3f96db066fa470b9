//! DOM overlay for restriction boxes
//!
//! The [`OverlayManager`] owns one container `div` stretched over the page
//! image. Every render replaces its children with the boxes laid out by
//! [`compose_overlay`](redaction_core::compose_overlay).

use redaction_core::{OverlayBox, OverlayLayer};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

/// Border of a drawn box
pub fn border_style(layer: OverlayLayer) -> &'static str {
    match layer {
        OverlayLayer::Existing => "2px solid #dc2626",
        OverlayLayer::Confirmed => "2px solid #2563eb",
        OverlayLayer::Live => "2px dashed #16a34a",
    }
}

/// Translucent fill of a drawn box
pub fn fill_style(layer: OverlayLayer) -> &'static str {
    match layer {
        OverlayLayer::Existing => "rgba(220, 38, 38, 0.15)",
        OverlayLayer::Confirmed => "rgba(37, 99, 235, 0.15)",
        OverlayLayer::Live => "rgba(22, 163, 74, 0.10)",
    }
}

pub struct OverlayManager {
    document: Document,
    container: HtmlElement,
}

impl OverlayManager {
    /// Create the overlay container inside `host`, which must be the
    /// positioned wrapper of the page image.
    ///
    /// # Errors
    /// Returns JsValue error if unable to access the document or create elements
    pub fn new(host: &HtmlElement) -> Result<Self, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object available"))?;

        let container: HtmlElement = document.create_element("div")?.dyn_into()?;
        container.set_class_name("restriction-overlay");
        let style = container.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("pointer-events", "none")?;
        host.append_child(&container)?;

        Ok(Self {
            document,
            container,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Replace all drawn boxes
    pub fn render(&self, boxes: &[OverlayBox]) -> Result<(), JsValue> {
        self.clear();
        for overlay_box in boxes {
            let element = self.create_box(overlay_box)?;
            self.container.append_child(&element)?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.container.set_inner_html("");
    }

    pub fn box_count(&self) -> u32 {
        self.container.child_element_count()
    }

    /// Remove the container from the page
    pub fn detach(&self) {
        self.container.remove();
    }

    fn create_box(&self, overlay_box: &OverlayBox) -> Result<Element, JsValue> {
        let element: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        element.set_class_name(overlay_box.layer.class_name());
        if let Some(id) = &overlay_box.restriction_id {
            element.set_attribute("data-restriction-id", id)?;
        }

        let rect = overlay_box.rect;
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("box-sizing", "border-box")?;
        style.set_property("left", &format!("{}px", rect.x))?;
        style.set_property("top", &format!("{}px", rect.y))?;
        style.set_property("width", &format!("{}px", rect.width))?;
        style.set_property("height", &format!("{}px", rect.height))?;
        style.set_property("z-index", &overlay_box.z_index.to_string())?;
        style.set_property("border", border_style(overlay_box.layer))?;
        style.set_property("background", fill_style(overlay_box.layer))?;

        let label: HtmlElement = self.document.create_element("span")?.dyn_into()?;
        label.set_class_name("restriction-label");
        label.set_text_content(Some(&overlay_box.label));
        let label_style = label.style();
        label_style.set_property("position", "absolute")?;
        label_style.set_property("top", "-1.4em")?;
        label_style.set_property("left", "0")?;
        label_style.set_property("font-size", "12px")?;
        label_style.set_property("white-space", "nowrap")?;
        element.append_child(&label)?;

        Ok(element.into())
    }
}
