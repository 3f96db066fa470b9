//! Overlay layout for the document image
//!
//! Produces the boxes to draw on top of the page, already in display space.
//! Stored rectangles are converted on every layout so overlays follow the
//! image when it is resized.

use crate::coords::to_display;
use redaction_types::{DisplayRect, DisplaySize, NaturalRect, NaturalSize, Restriction};
use serde::Serialize;

/// Overlay layers, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLayer {
    Existing,
    Confirmed,
    Live,
}

impl OverlayLayer {
    pub fn z_index(&self) -> i32 {
        match self {
            OverlayLayer::Existing => 10,
            OverlayLayer::Confirmed => 20,
            OverlayLayer::Live => 30,
        }
    }

    /// CSS class of the drawn box
    pub fn class_name(&self) -> &'static str {
        match self {
            OverlayLayer::Existing => "restriction-box restriction-existing",
            OverlayLayer::Confirmed => "restriction-box restriction-selected",
            OverlayLayer::Live => "restriction-box restriction-live",
        }
    }
}

/// A positioned, labelled box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayBox {
    pub layer: OverlayLayer,
    pub label: String,
    pub rect: DisplayRect,
    pub z_index: i32,
    /// Id of the restriction drawn, for existing restrictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction_id: Option<String>,
}

impl OverlayBox {
    fn new(layer: OverlayLayer, label: String, rect: DisplayRect) -> Self {
        Self {
            layer,
            label,
            rect,
            z_index: layer.z_index(),
            restriction_id: None,
        }
    }
}

/// Everything the overlay shows for one render
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub live: Option<DisplayRect>,
    pub confirmed: Option<NaturalRect>,
    pub existing: &'a [Restriction],
    pub natural: NaturalSize,
    pub display: DisplaySize,
    pub live_label: &'a str,
}

/// Lay out all three layers, bottom-most first.
///
/// Nothing stored in natural space is drawn while the image size is unknown:
/// the identity passthrough would put it at the wrong place.
pub fn compose_overlay(input: OverlayInput<'_>) -> Vec<OverlayBox> {
    let mut boxes = Vec::new();
    let can_scale = !input.natural.is_degenerate() && !input.display.is_degenerate();

    if can_scale {
        for restriction in input.existing {
            if let Some(area) = restriction.target.area() {
                let mut b = OverlayBox::new(
                    OverlayLayer::Existing,
                    format!("Existing: {}", restriction.field()),
                    to_display(area, input.natural, input.display),
                );
                b.restriction_id = Some(restriction.id.clone());
                boxes.push(b);
            }
        }

        if let Some(selection) = input.confirmed {
            boxes.push(OverlayBox::new(
                OverlayLayer::Confirmed,
                "Selected".to_string(),
                to_display(selection, input.natural, input.display),
            ));
        }
    }

    if let Some(live) = input.live {
        boxes.push(OverlayBox::new(
            OverlayLayer::Live,
            input.live_label.to_string(),
            live,
        ));
    }

    boxes
}
