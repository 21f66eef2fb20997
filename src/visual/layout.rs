//! Measure and arrange passes.
//!
//! `measure` runs bottom-up (a visual measures its children from inside its
//! own `measure`), `arrange` top-down. Both skip clean subtrees whose input
//! did not change.

use crate::geometry::{Point, Rect, Size, Vector};
use crate::render::{FormattedText, Font, Renderer, TextOptions};

use super::box_model::{AxisAlignment, Dirty, LayoutProps};
use super::tree::{VisualId, VisualTree};

/// Layout access handed to [`Visual::measure`](super::Visual::measure) and
/// [`Visual::arrange`](super::Visual::arrange).
pub struct LayoutCx<'a> {
    tree: &'a mut VisualTree,
    renderer: Option<&'a mut (dyn Renderer + 'static)>,
}

impl<'a> LayoutCx<'a> {
    pub fn new(
        tree: &'a mut VisualTree,
        renderer: Option<&'a mut (dyn Renderer + 'static)>,
    ) -> Self {
        Self { tree, renderer }
    }

    pub fn tree(&self) -> &VisualTree {
        self.tree
    }

    /// Snapshot of the children of `id`.
    pub fn children(&self, id: VisualId) -> Vec<VisualId> {
        self.tree.children(id).to_vec()
    }

    pub fn layout(&self, id: VisualId) -> Option<LayoutProps> {
        self.tree.layout(id).cloned()
    }

    pub fn desired_size(&self, id: VisualId) -> Size {
        self.tree.desired_size(id)
    }

    /// The renderer, when layout runs with one (text needs it).
    pub fn renderer(&mut self) -> Option<&mut (dyn Renderer + 'static)> {
        self.renderer.as_deref_mut()
    }

    /// Shape text through the renderer, if there is one.
    pub fn create_text(
        &mut self,
        text: &str,
        font: &Font,
        options: &TextOptions,
    ) -> Option<Box<dyn FormattedText>> {
        self.renderer()
            .map(|renderer| renderer.create_formatted_text(text, font, options))
    }

    /// Measure `id` against `available` and return its desired size
    /// (margin included).
    pub fn measure(&mut self, id: VisualId, available: Size) -> Size {
        let Some(node) = self.tree.nodes.get(id) else {
            return Size::ZERO;
        };
        if !node.dirty.contains(Dirty::MEASURE) && node.last_available == Some(available) {
            return node.desired_size;
        }
        let layout = node.layout.clone();
        let margin = layout.margin.get();
        let padding = layout.padding.get();
        let min = layout.minimum_size.get();
        let max = layout.maximum_size.get();

        let content_available = available.shrink(margin).min(max).shrink(padding);
        let renderer = self.renderer.as_deref_mut();
        let content = self
            .tree
            .with_visual(id, |visual, tree| {
                let mut cx = LayoutCx { tree, renderer };
                visual.measure(&mut cx, id, content_available)
            })
            .unwrap_or(Size::ZERO);

        let measured = content.non_negative().grow(padding).clamp(min, max);
        let desired = measured.grow(margin);
        if let Some(node) = self.tree.nodes.get_mut(id) {
            node.measured_size = measured;
            node.desired_size = desired;
            node.last_available = Some(available);
            node.dirty.remove(Dirty::MEASURE);
            // A new measurement always needs a new arrangement.
            node.dirty.insert(Dirty::ARRANGE);
        }
        desired
    }

    /// Place `id` inside `slot` (the space its parent offers, margin
    /// included) and arrange its children.
    pub fn arrange(&mut self, id: VisualId, slot: Rect) {
        let Some(node) = self.tree.nodes.get(id) else {
            return;
        };
        if !node.dirty.contains(Dirty::ARRANGE) && node.last_final == Some(slot) {
            return;
        }
        let layout = node.layout.clone();
        let measured = node.measured_size;
        let margin = layout.margin.get();
        let padding = layout.padding.get();
        let min = layout.minimum_size.get();
        let max = layout.maximum_size.get();
        let horizontal = AxisAlignment::from(layout.horizontal_alignment.get());
        let vertical = AxisAlignment::from(layout.vertical_alignment.get());

        let span = slot.shrink(margin);
        let (dx, width) = horizontal.place(span.width, measured.width, min.width, max.width);
        let (dy, height) = vertical.place(span.height, measured.height, min.height, max.height);
        let bounds = Rect::from_origin_size(
            span.origin() + Vector::new(dx, dy),
            Size::new(width, height),
        );

        if let Some(node) = self.tree.nodes.get_mut(id) {
            if node.bounds != bounds {
                node.dirty.insert(Dirty::RENDER);
            }
            node.bounds = bounds;
            node.last_final = Some(slot);
        }

        let content = bounds.shrink(padding);
        let renderer = self.renderer.as_deref_mut();
        self.tree.with_visual(id, |visual, tree| {
            let mut cx = LayoutCx { tree, renderer };
            visual.arrange(&mut cx, id, content);
        });

        if let Some(node) = self.tree.nodes.get_mut(id) {
            node.dirty.remove(Dirty::ARRANGE);
        }
    }
}

impl VisualTree {
    /// Run a full layout pass for the subtree at `root` filling `size`.
    pub fn update_layout(
        &mut self,
        root: VisualId,
        size: Size,
        renderer: Option<&mut (dyn Renderer + 'static)>,
    ) {
        self.apply_pending();
        let _span = tracing::trace_span!("layout", width = size.width, height = size.height).entered();
        let mut cx = LayoutCx::new(self, renderer);
        cx.measure(root, size);
        cx.arrange(root, Rect::from_origin_size(Point::ORIGIN, size));
    }
}
