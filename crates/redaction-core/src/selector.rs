//! Pointer-driven rectangle selection over the displayed page image
//!
//! The gesture lives in display space. Conversion to natural space happens
//! once, when a drag is released with a large enough rectangle.

use crate::coords::to_natural;
use redaction_types::{DisplayPoint, DisplayRect, DisplaySize, NaturalRect, NaturalSize};
use tracing::{debug, trace};

/// Default minimum drag size in display pixels
pub const MIN_SELECTION_PX: f64 = 10.0;

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    Dragging {
        anchor: DisplayPoint,
        current: DisplayPoint,
    },
}

/// Outcome of finishing a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Large enough: stored as the confirmed selection
    Confirmed(NaturalRect),
    /// Too small, treated as a click
    Discarded,
    /// There was no drag in progress
    NotDragging,
    /// The image's natural size is unknown, so the drag cannot be converted
    ImageNotReady,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    state: SelectorState,
    confirmed: Option<NaturalRect>,
    min_size: f64,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(MIN_SELECTION_PX)
    }
}

impl Selector {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: SelectorState::Idle,
            confirmed: None,
            min_size,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectorState::Dragging { .. })
    }

    /// The last emitted selection, in natural space
    pub fn confirmed(&self) -> Option<NaturalRect> {
        self.confirmed
    }

    /// Rectangle currently being dragged
    pub fn live_rect(&self) -> Option<DisplayRect> {
        match self.state {
            SelectorState::Dragging { anchor, current } => {
                Some(DisplayRect::from_corners(anchor, current))
            }
            SelectorState::Idle => None,
        }
    }

    /// Pointer pressed. Starts a drag when the point is on the image and the
    /// image has finished loading.
    ///
    /// An existing confirmed selection is kept until a new one replaces it.
    pub fn press(
        &mut self,
        point: DisplayPoint,
        natural: NaturalSize,
        display: DisplaySize,
    ) -> bool {
        if natural.is_degenerate() {
            trace!("press ignored until the image size is known");
            return false;
        }
        if display.is_degenerate() || !display.contains(point) {
            trace!(x = point.x, y = point.y, "press outside image ignored");
            return false;
        }
        self.state = SelectorState::Dragging {
            anchor: point,
            current: point,
        };
        debug!(x = point.x, y = point.y, "selection drag started");
        true
    }

    /// Pointer moved. The far corner never leaves the image.
    pub fn move_to(&mut self, point: DisplayPoint, display: DisplaySize) {
        if let SelectorState::Dragging { anchor, .. } = self.state {
            self.state = SelectorState::Dragging {
                anchor,
                current: display.clamp(point),
            };
        }
    }

    /// Pointer released at `point`.
    pub fn release(
        &mut self,
        point: DisplayPoint,
        natural: NaturalSize,
        display: DisplaySize,
    ) -> DragOutcome {
        self.move_to(point, display);
        self.finish(natural, display)
    }

    /// Pointer left the image while dragging: finish at the last known position
    pub fn leave(&mut self, natural: NaturalSize, display: DisplaySize) -> DragOutcome {
        self.finish(natural, display)
    }

    /// Drop both the gesture and the confirmed selection
    pub fn clear(&mut self) {
        self.state = SelectorState::Idle;
        self.confirmed = None;
    }

    fn finish(&mut self, natural: NaturalSize, display: DisplaySize) -> DragOutcome {
        let Some(rect) = self.live_rect() else {
            return DragOutcome::NotDragging;
        };
        self.state = SelectorState::Idle;

        if natural.is_degenerate() || display.is_degenerate() {
            debug!("image size unknown, selection dropped");
            return DragOutcome::ImageNotReady;
        }

        if rect.width <= self.min_size || rect.height <= self.min_size {
            debug!(
                width = rect.width,
                height = rect.height,
                "selection below minimum size discarded"
            );
            return DragOutcome::Discarded;
        }

        // rounding x and width separately can overshoot the edge by a pixel
        let selection = to_natural(rect, natural, display).clamped_to(natural);
        debug!(
            x = selection.x,
            y = selection.y,
            width = selection.width,
            height = selection.height,
            "selection confirmed"
        );
        self.confirmed = Some(selection);
        DragOutcome::Confirmed(selection)
    }
}
