//! Field and area restriction engine
//!
//! This crate holds the target-independent part of the restriction panel:
//! - coordinate transforms between natural image space and display space
//! - the drag selector producing restriction areas
//! - the restriction form and its validation gate
//! - overlay layout for existing and pending restrictions
//! - the restriction store, generic over the persistence API
//!
//! The browser binding lives in the `redaction-wasm` app.

pub mod api;
pub mod config;
pub mod coords;
pub mod error;
pub mod form;
pub mod overlay;
pub mod selector;
pub mod store;

pub use api::RestrictionApi;
pub use config::PanelConfig;
pub use coords::{scale_factors, to_display, to_natural};
pub use error::{RestrictionError, Result, ValidationError};
pub use form::{RestrictionForm, TargetMode};
pub use overlay::{compose_overlay, OverlayBox, OverlayInput, OverlayLayer};
pub use selector::{DragOutcome, Selector, SelectorState, MIN_SELECTION_PX};
pub use store::{AnnotatedRestriction, FetchOutcome, Notice, RestrictionStore};

// Re-export the data model so consumers need a single dependency
pub use redaction_types;
