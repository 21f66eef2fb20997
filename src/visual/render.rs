//! The render pass.

use crate::geometry::Rect;
use crate::render::Renderer;

use super::box_model::Dirty;
use super::tree::{VisualId, VisualTree};

/// What a visual sees while painting.
pub struct RenderCx<'a> {
    renderer: &'a mut dyn Renderer,
    bounds: Rect,
    content: Rect,
}

impl<'a> RenderCx<'a> {
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    /// Arranged bounds of the visual being painted.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bounds inset by padding.
    pub fn content_bounds(&self) -> Rect {
        self.content
    }
}

impl VisualTree {
    /// Paint the subtree at `root`, parents before children, and clear the
    /// render bits.
    pub fn render(&mut self, root: VisualId, renderer: &mut dyn Renderer) {
        let Some(node) = self.nodes.get(root) else {
            return;
        };
        let bounds = node.bounds;
        let content = bounds.shrink(node.layout.padding.get());
        if let Some(visual) = node.visual.as_ref() {
            let mut cx = RenderCx {
                renderer: &mut *renderer,
                bounds,
                content,
            };
            visual.render(&mut cx);
        }
        let children = node.children.clone();
        if let Some(node) = self.nodes.get_mut(root) {
            node.dirty.remove(Dirty::RENDER);
        }
        for child in children {
            self.render(child, renderer);
        }
    }
}
