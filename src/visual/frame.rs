//! Frame and Rectangle: overlay panels.

use std::any::Any;

use crate::property::{Invalidation, PropertyList, VisualProperty};
use crate::render::Brush;

use super::render::RenderCx;
use super::traits::Visual;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A panel that paints nothing and overlays its children.
///
/// Used as the canvas root and as the default children host.
#[derive(Debug, Default)]
pub struct Frame;

impl Frame {
    pub fn new() -> Self {
        Self
    }
}

impl Visual for Frame {
    fn type_name(&self) -> &'static str {
        "Frame"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Rectangle
// ---------------------------------------------------------------------------

/// A panel filled with a brush. Children are overlaid on top of the fill.
pub struct Rectangle {
    pub fill: VisualProperty<Brush>,
}

impl Rectangle {
    pub fn new() -> Self {
        Self {
            fill: VisualProperty::new("Fill", Brush::None, Invalidation::Render),
        }
    }

    pub fn with_fill(self, fill: impl Into<Brush>) -> Self {
        self.fill.set_value(fill.into());
        self
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new()
    }
}

impl Visual for Rectangle {
    fn type_name(&self) -> &'static str {
        "Rectangle"
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new().with_visual(&self.fill)
    }

    fn render(&self, cx: &mut RenderCx<'_>) {
        let fill = self.fill.get();
        if fill.is_visible() {
            let bounds = cx.bounds();
            cx.renderer().fill_rectangle(bounds, &fill);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
