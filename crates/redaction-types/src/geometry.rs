//! Rectangles tagged with the coordinate space they live in
//!
//! A document page image has two coordinate systems:
//! - natural space: the source raster's true pixel resolution
//! - display space: the size the image is currently rendered at on screen
//!
//! Both use a top-left origin with Y growing downwards. The space is carried
//! as a zero-sized type parameter, so a `DisplayRect` cannot be passed where a
//! `NaturalRect` is expected without going through a transform.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

mod sealed {
    pub trait Sealed {}
}

/// Marker trait for coordinate spaces
pub trait Space:
    sealed::Sealed + Copy + Clone + std::fmt::Debug + PartialEq + Default + 'static
{
    /// Human readable name, used in logs
    const NAME: &'static str;
}

/// Source image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaturalSpace;

/// On-screen rendered space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySpace;

impl sealed::Sealed for NaturalSpace {}
impl sealed::Sealed for DisplaySpace {}

impl Space for NaturalSpace {
    const NAME: &'static str = "natural";
}

impl Space for DisplaySpace {
    const NAME: &'static str = "display";
}

/// Width/height pair in a given space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Size<S: Space> {
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Size<S> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            space: PhantomData,
        }
    }

    /// True while an image has not finished loading (or failed to):
    /// a zero or non-finite side cannot be used as a scale denominator.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Whether a point lies inside `[0, width] x [0, height]`
    pub fn contains(&self, point: Point<S>) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }

    /// Constrain a point to `[0, width] x [0, height]`
    pub fn clamp(&self, point: Point<S>) -> Point<S> {
        Point::new(
            point.x.clamp(0.0, self.width.max(0.0)),
            point.y.clamp(0.0, self.height.max(0.0)),
        )
    }
}

/// A pointer position in a given space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Point<S: Space> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Point<S> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }
}

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Rect<S: Space> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Rect<S> {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            space: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Normalized bounding box of two corner points, in either drag direction
    pub fn from_corners(a: Point<S>, b: Point<S>) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn has_positive_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    /// Rectangle lies entirely within `[0, size.width] x [0, size.height]`
    pub fn fits_within(&self, size: Size<S>) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= size.width && self.bottom() <= size.height
    }

    /// Shrink the rectangle so it lies within `[0, size.width] x [0, size.height]`
    pub fn clamped_to(&self, size: Size<S>) -> Self {
        let x = self.x.clamp(0.0, size.width.max(0.0));
        let y = self.y.clamp(0.0, size.height.max(0.0));
        let right = self.right().clamp(x, size.width.max(x));
        let bottom = self.bottom().clamp(y, size.height.max(y));
        Self::new(x, y, right - x, bottom - y)
    }

    /// Re-tag the raw numbers in another space.
    ///
    /// Only the coordinate transform uses this, for its identity passthrough.
    #[doc(hidden)]
    pub fn retag<T: Space>(self) -> Rect<T> {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

pub type NaturalRect = Rect<NaturalSpace>;
pub type DisplayRect = Rect<DisplaySpace>;
pub type NaturalSize = Size<NaturalSpace>;
pub type DisplaySize = Size<DisplaySpace>;
pub type DisplayPoint = Point<DisplaySpace>;
