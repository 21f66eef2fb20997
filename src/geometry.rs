//! Core geometry types: Point, Vector, Size, Rect, Thickness.
//!
//! Layout runs in logical units (`f32`). The canvas scale converts between
//! physical device pixels and these units before anything reaches the tree.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Point / Vector
// ---------------------------------------------------------------------------

/// A position in logical units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Divide both coordinates by `factor`. Used to convert physical pixels to
    /// logical units.
    #[inline]
    pub fn unscale(self, factor: f32) -> Point {
        Point::new(self.x / factor, self.y / factor)
    }
}

/// A displacement in logical units (pointer deltas, scroll amounts).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn unscale(self, factor: f32) -> Vector {
        Vector::new(self.x / factor, self.y / factor)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Vector) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Vector;
    #[inline]
    fn sub(self, rhs: Point) -> Vector {
        Vector { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Vector {
    type Output = Vector;
    #[inline]
    fn neg(self) -> Vector {
        Vector { x: -self.x, y: -self.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D extent in logical units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };
    pub const INFINITE: Size = Size { width: f32::INFINITY, height: f32::INFINITY };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions clamped to be non-negative.
    #[inline]
    pub fn non_negative(self) -> Size {
        Size::new(self.width.max(0.0), self.height.max(0.0))
    }

    /// Component-wise clamp into `[min, max]`. `min` wins when the bounds cross.
    #[inline]
    pub fn clamp(self, min: Size, max: Size) -> Size {
        Size::new(
            self.width.min(max.width).max(min.width),
            self.height.min(max.height).max(min.height),
        )
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Grow by the given [`Thickness`].
    #[inline]
    pub fn grow(self, thickness: Thickness) -> Size {
        Size::new(
            self.width + thickness.horizontal(),
            self.height + thickness.vertical(),
        )
    }

    /// Shrink by the given [`Thickness`]. Never negative.
    #[inline]
    pub fn shrink(self, thickness: Thickness) -> Size {
        Size::new(
            (self.width - thickness.horizontal()).max(0.0),
            (self.height - thickness.vertical()).max(0.0),
        )
    }

    /// Divide both dimensions by `factor`.
    #[inline]
    pub fn unscale(self, factor: f32) -> Size {
        Size::new(self.width / factor, self.height / factor)
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size { width: self.width + rhs.width, height: self.height + rhs.height }
    }
}

impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size { width: self.width - rhs.width, height: self.height - rhs.height }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in logical units.
///
/// The left and top edges are inclusive, the right and bottom edges exclusive,
/// so adjacent rectangles never both contain a shared edge point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// A rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub const fn origin(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` lies inside this rectangle.
    #[inline]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translate the rectangle by a [`Vector`].
    #[inline]
    pub fn translate(self, by: Vector) -> Rect {
        Rect { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Express `point` relative to this rectangle's origin.
    #[inline]
    pub fn to_local(self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }

    /// Contract the rectangle inward by the given [`Thickness`].
    ///
    /// Width and height are clamped to zero to avoid negative dimensions.
    #[inline]
    pub fn shrink(self, thickness: Thickness) -> Rect {
        Rect {
            x: self.x + thickness.left,
            y: self.y + thickness.top,
            width: (self.width - thickness.horizontal()).max(0.0),
            height: (self.height - thickness.vertical()).max(0.0),
        }
    }

    /// Expand the rectangle outward by the given [`Thickness`].
    #[inline]
    pub fn grow(self, thickness: Thickness) -> Rect {
        Rect {
            x: self.x - thickness.left,
            y: self.y - thickness.top,
            width: self.width + thickness.horizontal(),
            height: self.height + thickness.vertical(),
        }
    }
}

// ---------------------------------------------------------------------------
// Thickness
// ---------------------------------------------------------------------------

/// Spacing around the four sides of a rectangle, used for margin and padding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const ZERO: Thickness = Thickness { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 };

    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: f32) -> Self {
        Self { left: value, top: value, right: value, bottom: value }
    }

    /// `horizontal` for left/right, `vertical` for top/bottom.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self { left: horizontal, top: vertical, right: horizontal, bottom: vertical }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub fn horizontal(self) -> f32 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}

impl Add for Thickness {
    type Output = Thickness;
    #[inline]
    fn add(self, rhs: Thickness) -> Thickness {
        Thickness {
            left: self.left + rhs.left,
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
