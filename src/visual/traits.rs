//! The `Visual` trait: layout, painting and input hooks of a rendered node.

use std::any::Any;

use crate::geometry::{Rect, Size};
use crate::input::{InputCx, RoutedInput};
use crate::property::PropertyList;

use super::layout::LayoutCx;
use super::render::RenderCx;
use super::tree::VisualId;

/// A node of the visual tree.
///
/// The tree owns the box model (margin, padding, size bounds, alignment) and
/// the parent/child structure; an implementation only decides how its
/// content is sized, where its children go, and what it paints.
pub trait Visual: Any {
    /// Short name used in dumps and logs.
    fn type_name(&self) -> &'static str;

    /// Properties activated while this visual is attached. The box-model
    /// properties are handled by the tree and must not be listed here.
    fn properties(&self) -> PropertyList {
        PropertyList::new()
    }

    /// Size the content against `available` (already reduced by margin and
    /// padding). The default overlays children: the largest desired size.
    fn measure(&mut self, cx: &mut LayoutCx<'_>, id: VisualId, available: Size) -> Size {
        let mut size = Size::ZERO;
        for child in cx.children(id) {
            let desired = cx.measure(child, available);
            size.width = size.width.max(desired.width);
            size.height = size.height.max(desired.height);
        }
        size
    }

    /// Position children inside `content` (the arranged bounds inset by
    /// padding). The default gives every child the whole content rect.
    fn arrange(&mut self, cx: &mut LayoutCx<'_>, id: VisualId, content: Rect) {
        for child in cx.children(id) {
            cx.arrange(child, content);
        }
    }

    /// Paint this visual. Children are painted afterwards, on top.
    fn render(&self, _cx: &mut RenderCx<'_>) {}

    /// Tunnel-phase input handler (root to target).
    fn on_input_preview(&mut self, _cx: &mut InputCx<'_>, _input: &mut RoutedInput) {}

    /// Bubble-phase input handler (target to root).
    fn on_input(&mut self, _cx: &mut InputCx<'_>, _input: &mut RoutedInput) {}

    fn on_pointer_enter(&mut self, _cx: &mut InputCx<'_>) {}

    fn on_pointer_leave(&mut self, _cx: &mut InputCx<'_>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
