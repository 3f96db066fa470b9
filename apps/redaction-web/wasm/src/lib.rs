//! Browser binding for the restriction panel
//!
//! Wires the target-independent pieces of `redaction-core` to the DOM:
//! a `fetch`-backed [`RestrictionApi`](redaction_core::RestrictionApi), the
//! page image, the overlay boxes, and a [`RestrictionPanel`] facade that the
//! host page drives from its pointer and form events.

use wasm_bindgen::prelude::*;

pub mod fetch_api;
pub mod image;
pub mod overlay;
pub mod panel;

pub use fetch_api::FetchRestrictionApi;
pub use image::{display_size, natural_size, wait_for_image};
pub use overlay::OverlayManager;
pub use panel::RestrictionPanel;

/// Bundled panel defaults
pub(crate) const DEFAULT_CONFIG: &str = include_str!("../panel.toml");

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn console_log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

pub(crate) fn console_error(msg: &str) {
    web_sys::console::error_1(&msg.into());
}

/// Best-effort text for a JavaScript exception
pub(crate) fn js_error_text(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err))
}
