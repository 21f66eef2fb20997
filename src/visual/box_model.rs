//! Box-model properties shared by every visual, and dirty-state bits.

use crate::geometry::{Size, Thickness};
use crate::property::{Invalidation, PropertyList, VisualProperty};

/// Horizontal placement within the space a parent offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    Stretch,
    Left,
    Center,
    Right,
}

/// Vertical placement within the space a parent offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    #[default]
    Stretch,
    Top,
    Center,
    Bottom,
}

/// Where along an axis a box of `size` sits in a span, and how large it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AxisAlignment {
    Stretch,
    Start,
    Center,
    End,
}

impl From<HorizontalAlignment> for AxisAlignment {
    fn from(value: HorizontalAlignment) -> Self {
        match value {
            HorizontalAlignment::Stretch => AxisAlignment::Stretch,
            HorizontalAlignment::Left => AxisAlignment::Start,
            HorizontalAlignment::Center => AxisAlignment::Center,
            HorizontalAlignment::Right => AxisAlignment::End,
        }
    }
}

impl From<VerticalAlignment> for AxisAlignment {
    fn from(value: VerticalAlignment) -> Self {
        match value {
            VerticalAlignment::Stretch => AxisAlignment::Stretch,
            VerticalAlignment::Top => AxisAlignment::Start,
            VerticalAlignment::Center => AxisAlignment::Center,
            VerticalAlignment::Bottom => AxisAlignment::End,
        }
    }
}

impl AxisAlignment {
    /// Returns `(offset, extent)` within a span of length `span`.
    ///
    /// Stretch fills the span up to `max` (but never below `min`); the other
    /// alignments use `measured` exactly.
    pub(crate) fn place(self, span: f32, measured: f32, min: f32, max: f32) -> (f32, f32) {
        let extent = match self {
            AxisAlignment::Stretch => span.min(max).max(min),
            _ => measured,
        };
        let offset = match self {
            AxisAlignment::Start => 0.0,
            AxisAlignment::End => span - extent,
            AxisAlignment::Center | AxisAlignment::Stretch => (span - extent) / 2.0,
        };
        (offset, extent)
    }
}

/// Default lower bound for a visual's measured size.
pub const DEFAULT_MINIMUM_SIZE: Size = Size::new(1.0, 1.0);

/// Margin, padding, size bounds and alignment of one visual.
///
/// Cloning shares the underlying properties.
#[derive(Clone)]
pub struct LayoutProps {
    pub margin: VisualProperty<Thickness>,
    pub padding: VisualProperty<Thickness>,
    pub minimum_size: VisualProperty<Size>,
    pub maximum_size: VisualProperty<Size>,
    pub horizontal_alignment: VisualProperty<HorizontalAlignment>,
    pub vertical_alignment: VisualProperty<VerticalAlignment>,
}

impl LayoutProps {
    pub fn new() -> Self {
        Self {
            margin: VisualProperty::new("Margin", Thickness::ZERO, Invalidation::Measure),
            padding: VisualProperty::new("Padding", Thickness::ZERO, Invalidation::Measure),
            minimum_size: VisualProperty::new(
                "MinimumSize",
                DEFAULT_MINIMUM_SIZE,
                Invalidation::Measure,
            ),
            maximum_size: VisualProperty::new("MaximumSize", Size::INFINITE, Invalidation::Measure),
            horizontal_alignment: VisualProperty::new(
                "HorizontalAlignment",
                HorizontalAlignment::Stretch,
                Invalidation::Arrange,
            ),
            vertical_alignment: VisualProperty::new(
                "VerticalAlignment",
                VerticalAlignment::Stretch,
                Invalidation::Arrange,
            ),
        }
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with_visual(&self.margin)
            .with_visual(&self.padding)
            .with_visual(&self.minimum_size)
            .with_visual(&self.maximum_size)
            .with_visual(&self.horizontal_alignment)
            .with_visual(&self.vertical_alignment)
    }
}

impl Default for LayoutProps {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Dirty
// ---------------------------------------------------------------------------

/// Pending layout work for a visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dirty(u8);

impl Dirty {
    pub const NONE: Dirty = Dirty(0);
    pub const MEASURE: Dirty = Dirty(0b001);
    pub const ARRANGE: Dirty = Dirty(0b010);
    pub const RENDER: Dirty = Dirty(0b100);
    pub const ALL: Dirty = Dirty(0b111);

    /// Bits raised by an invalidation, including the passes it implies.
    pub fn implied_by(invalidation: Invalidation) -> Dirty {
        match invalidation {
            Invalidation::None => Dirty::NONE,
            Invalidation::Measure => Dirty::ALL,
            Invalidation::Arrange => Dirty(Dirty::ARRANGE.0 | Dirty::RENDER.0),
            Invalidation::Render => Dirty::RENDER,
        }
    }

    pub fn contains(self, other: Dirty) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Dirty) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Dirty) {
        self.0 &= !other.0;
    }

    pub fn is_clean(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_implies_later_passes() {
        assert_eq!(Dirty::implied_by(Invalidation::Measure), Dirty::ALL);
        let arrange = Dirty::implied_by(Invalidation::Arrange);
        assert!(arrange.contains(Dirty::ARRANGE) && arrange.contains(Dirty::RENDER));
        assert!(!arrange.contains(Dirty::MEASURE));
        assert_eq!(Dirty::implied_by(Invalidation::Render), Dirty::RENDER);
        assert!(Dirty::implied_by(Invalidation::None).is_clean());
    }

    #[test]
    fn place_non_stretch_uses_measured_size() {
        assert_eq!(AxisAlignment::Start.place(10.0, 4.0, 1.0, f32::INFINITY), (0.0, 4.0));
        assert_eq!(AxisAlignment::Center.place(10.0, 4.0, 1.0, f32::INFINITY), (3.0, 4.0));
        assert_eq!(AxisAlignment::End.place(10.0, 4.0, 1.0, f32::INFINITY), (6.0, 4.0));
    }

    #[test]
    fn place_stretch_caps_at_maximum() {
        assert_eq!(AxisAlignment::Stretch.place(10.0, 4.0, 1.0, f32::INFINITY), (0.0, 10.0));
        assert_eq!(AxisAlignment::Stretch.place(10.0, 4.0, 1.0, 6.0), (2.0, 6.0));
    }

    #[test]
    fn default_bounds() {
        let layout = LayoutProps::new();
        assert_eq!(layout.minimum_size.get(), Size::new(1.0, 1.0));
        assert_eq!(layout.maximum_size.get(), Size::INFINITE);
        assert_eq!(layout.properties().len(), 6);
    }
}
