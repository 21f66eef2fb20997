//! LinearLayout: stacks children along one axis.

use std::any::Any;

use crate::geometry::{Rect, Size};
use crate::property::{Invalidation, PropertyList, VisualProperty};

use super::layout::LayoutCx;
use super::traits::Visual;
use super::tree::VisualId;

/// Stacking axis of a [`LinearLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    fn main(self, size: Size) -> f32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }
}

/// Places children one after another along [`orientation`](Self::orientation).
///
/// Measured size: the sum of the children's desired sizes along the axis and
/// their maximum across it. Each child is arranged with the full cross-axis
/// extent and its desired main-axis extent.
pub struct LinearLayout {
    pub orientation: VisualProperty<Orientation>,
}

impl LinearLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation: VisualProperty::new("Orientation", orientation, Invalidation::Measure),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

impl Visual for LinearLayout {
    fn type_name(&self) -> &'static str {
        "LinearLayout"
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new().with_visual(&self.orientation)
    }

    fn measure(&mut self, cx: &mut LayoutCx<'_>, id: VisualId, available: Size) -> Size {
        let orientation = self.orientation.get();
        let cross_available = orientation.cross(available);
        let mut main = 0.0_f32;
        let mut cross = 0.0_f32;
        for child in cx.children(id) {
            let remaining = (orientation.main(available) - main).max(0.0);
            let desired = cx.measure(child, orientation.size(remaining, cross_available));
            main += orientation.main(desired);
            cross = cross.max(orientation.cross(desired));
        }
        orientation.size(main, cross)
    }

    fn arrange(&mut self, cx: &mut LayoutCx<'_>, id: VisualId, content: Rect) {
        let orientation = self.orientation.get();
        let cross = orientation.cross(content.size());
        let mut offset = 0.0_f32;
        for child in cx.children(id) {
            let extent = orientation.main(cx.desired_size(child)).max(0.0);
            let slot = match orientation {
                Orientation::Horizontal => Rect::new(content.x + offset, content.y, extent, cross),
                Orientation::Vertical => Rect::new(content.x, content.y + offset, cross, extent),
            };
            cx.arrange(child, slot);
            offset += extent;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
