//! Coordinate transformation between natural image space and display space
//!
//! Restrictions are always persisted in natural space so they stay valid no
//! matter what size the page was rendered at when they were drawn.

use redaction_types::{DisplayRect, DisplaySize, NaturalRect, NaturalSize};

/// Horizontal and vertical natural/display ratios.
///
/// Returns `None` while either size is degenerate (image not loaded yet).
pub fn scale_factors(natural: NaturalSize, display: DisplaySize) -> Option<(f64, f64)> {
    if natural.is_degenerate() || display.is_degenerate() {
        return None;
    }
    Some((
        natural.width / display.width,
        natural.height / display.height,
    ))
}

/// Convert a display-space rectangle to natural pixels.
///
/// Results are rounded to whole pixels. With degenerate sizes the numbers are
/// passed through unchanged.
pub fn to_natural(rect: DisplayRect, natural: NaturalSize, display: DisplaySize) -> NaturalRect {
    if natural.is_degenerate() || display.is_degenerate() {
        return rect.retag();
    }

    let x_scale = |v: f64| (v * natural.width / display.width).round();
    let y_scale = |v: f64| (v * natural.height / display.height).round();

    NaturalRect::new(
        x_scale(rect.x),
        y_scale(rect.y),
        x_scale(rect.width),
        y_scale(rect.height),
    )
}

/// Convert a natural-space rectangle to display space, without rounding so
/// overlays can sit on sub-pixel positions.
pub fn to_display(rect: NaturalRect, natural: NaturalSize, display: DisplaySize) -> DisplayRect {
    if natural.is_degenerate() || display.is_degenerate() {
        return rect.retag();
    }

    let x_scale = |v: f64| v * display.width / natural.width;
    let y_scale = |v: f64| v * display.height / natural.height;

    DisplayRect::new(
        x_scale(rect.x),
        y_scale(rect.y),
        x_scale(rect.width),
        y_scale(rect.height),
    )
}
