//! The `Ui`: the control arena, the visual arena, and the work that keeps
//! the two in sync.

use std::fmt::Write as _;
use std::rc::Rc;

use slotmap::SlotMap;
use tracing::{debug, debug_span, trace, warn};

use super::base::{all_properties, ChildModel, Control, ControlId};
use super::template::TemplateCx;
use super::work::{Work, WorkQueue};
use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::property::Invalidation;
use crate::reactive::{ListSlot, Subscription};
use crate::render::Renderer;
use crate::style::{Context, Resources, StyleResolution};
use crate::visual::{Frame, VisualId, VisualTree};

/// Upper bound on work items drained by one [`Ui::flush`].
const FLUSH_LIMIT: usize = 10_000;

// ---------------------------------------------------------------------------
// ControlNode
// ---------------------------------------------------------------------------

struct BoundChildren {
    list: ListSlot<ControlId>,
    _changes: Subscription,
}

struct ControlNode {
    control: Box<dyn Control>,
    parent: Option<ControlId>,
    children: Vec<ControlId>,
    bound: Option<BoundChildren>,
    resources: Option<Resources>,
    /// Effective context, cached while attached.
    context: Option<Context>,
    attached: bool,
    visualization: Option<VisualId>,
    /// Visual whose children mirror this control's children.
    host: Option<VisualId>,
    subscriptions: Vec<Subscription>,
}

impl ControlNode {
    fn new(control: Box<dyn Control>) -> Self {
        Self {
            control,
            parent: None,
            children: Vec::new(),
            bound: None,
            resources: None,
            context: None,
            attached: false,
            visualization: None,
            host: None,
            subscriptions: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Owns every control and visual of one canvas.
///
/// Controls become attached when they are the root or a descendant of it.
/// Attaching activates their properties, resolves their styling and builds
/// their visualization; detaching undoes all three.
///
/// Property writes made through [`control`](Self::control) take effect on
/// the tree at the next [`flush`](Self::flush). Until then the tree reflects
/// the old values: after a template write, [`visualization`](Self::visualization)
/// and [`host`](Self::host) still return the previous visuals, and style or
/// children changes are not applied yet. Every `&mut self` entry point
/// flushes before returning; [`update`](Self::update) is the usual way to
/// write and flush in one step.
pub struct Ui {
    controls: SlotMap<ControlId, ControlNode>,
    visuals: VisualTree,
    work: WorkQueue,
    root_context: Context,
    root_visual: VisualId,
    root: Option<ControlId>,
}

impl Ui {
    pub fn new(resources: Resources) -> Self {
        let mut visuals = VisualTree::new();
        let root_visual = visuals.insert(Frame::new());
        visuals.set_root(root_visual, true);
        visuals.attach(root_visual);
        Self {
            controls: SlotMap::with_key(),
            visuals,
            work: WorkQueue::new(),
            root_context: Context::root(resources),
            root_visual,
            root: None,
        }
    }

    // -- arena --------------------------------------------------------------

    /// Add a detached, parentless control.
    pub fn add<C: Control>(&mut self, control: C) -> ControlId {
        self.add_boxed(Box::new(control))
    }

    pub fn add_boxed(&mut self, control: Box<dyn Control>) -> ControlId {
        self.controls.insert(ControlNode::new(control))
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    fn node(&self, id: ControlId) -> Result<&ControlNode> {
        self.controls.get(id).ok_or(Error::UnknownControl)
    }

    /// Typed access to a control.
    pub fn control<C: Control>(&self, id: ControlId) -> Result<&C> {
        let node = self.node(id)?;
        node.control
            .as_any()
            .downcast_ref::<C>()
            .ok_or(Error::ControlType {
                expected: std::any::type_name::<C>(),
                actual: node.control.type_name(),
            })
    }

    pub fn control_dyn(&self, id: ControlId) -> Result<&dyn Control> {
        Ok(&*self.node(id)?.control)
    }

    /// Run `f` against a control, then flush the work it caused.
    pub fn update<C: Control, R>(&mut self, id: ControlId, f: impl FnOnce(&C) -> R) -> Result<R> {
        let result = f(self.control::<C>(id)?);
        self.flush();
        Ok(result)
    }

    pub fn type_name(&self, id: ControlId) -> Option<&'static str> {
        self.controls.get(id).map(|n| n.control.type_name())
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.controls.get(id)?.parent
    }

    pub fn children(&self, id: ControlId) -> &[ControlId] {
        self.controls
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn is_attached(&self, id: ControlId) -> bool {
        self.controls.get(id).is_some_and(|n| n.attached)
    }

    /// Root visual of the control's current visualization.
    pub fn visualization(&self, id: ControlId) -> Option<VisualId> {
        self.controls.get(id)?.visualization
    }

    /// The visual hosting the control's children, if its template set one.
    pub fn host(&self, id: ControlId) -> Option<VisualId> {
        self.controls.get(id)?.host
    }

    pub fn root(&self) -> Option<ControlId> {
        self.root
    }

    /// The canvas visual; the root control's visualization is its only
    /// child.
    pub fn root_visual(&self) -> VisualId {
        self.root_visual
    }

    pub fn visuals(&self) -> &VisualTree {
        &self.visuals
    }

    /// Structural access stays inside the crate: visualizations and hosts
    /// are owned by their controls.
    pub(crate) fn visuals_mut(&mut self) -> &mut VisualTree {
        &mut self.visuals
    }

    /// Mark `visual` (and its ancestors) for another layout or render pass.
    pub fn invalidate(&mut self, visual: VisualId, invalidation: Invalidation) {
        self.visuals.invalidate(visual, invalidation);
    }

    // -- root ---------------------------------------------------------------

    /// Make `id` the root control, detaching the previous one. `None`
    /// clears the root.
    pub fn set_root(&mut self, id: Option<ControlId>) -> Result<()> {
        if let Some(id) = id {
            if self.node(id)?.parent.is_some() {
                return Err(Error::AlreadyParented);
            }
        }
        if self.root == id {
            return Ok(());
        }
        if let Some(old) = self.root.take() {
            self.detach(old);
        }
        self.root = id;
        if let Some(id) = id {
            self.attach(id);
        }
        self.flush();
        Ok(())
    }

    // -- contexts -----------------------------------------------------------

    pub fn root_context(&self) -> &Context {
        &self.root_context
    }

    /// Replace the resources at the root of every context chain.
    pub fn set_root_resources(&mut self, resources: Resources) {
        self.root_context = Context::root(resources);
        if let Some(root) = self.root {
            self.refresh_subtree(root);
        }
        self.flush();
    }

    /// Scope `resources` to `id` and its descendants. `None` removes them.
    pub fn set_resources(&mut self, id: ControlId, resources: Option<Resources>) -> Result<()> {
        self.controls
            .get_mut(id)
            .ok_or(Error::UnknownControl)?
            .resources = resources;
        self.refresh_subtree(id);
        self.flush();
        Ok(())
    }

    /// Effective context of `id`: its own resources (if any) chained onto
    /// its parent's context, or onto the root context for parentless
    /// controls.
    pub fn context(&mut self, id: ControlId) -> Result<Context> {
        self.node(id)?;
        Ok(self.context_of(id))
    }

    fn context_of(&mut self, id: ControlId) -> Context {
        let Some(node) = self.controls.get(id) else {
            return self.root_context.clone();
        };
        if let Some(context) = &node.context {
            return context.clone();
        }
        let parent = node.parent;
        let resources = node.resources.clone();
        let inherited = match parent {
            Some(parent) => self.context_of(parent),
            None => self.root_context.clone(),
        };
        let context = match resources {
            Some(resources) => inherited.child(resources),
            None => inherited,
        };
        if let Some(node) = self.controls.get_mut(id) {
            if node.attached {
                node.context = Some(context.clone());
            }
        }
        context
    }

    /// Drop cached contexts below `id` and rebuild the visualizations that
    /// depend on them.
    fn refresh_subtree(&mut self, id: ControlId) {
        let mut stack = vec![id];
        let mut order = Vec::new();
        while let Some(current) = stack.pop() {
            let Some(node) = self.controls.get_mut(current) else {
                continue;
            };
            node.context = None;
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        for current in order {
            self.visualize(current);
        }
    }

    // -- attachment ---------------------------------------------------------

    fn attach(&mut self, id: ControlId) {
        let Some(node) = self.controls.get_mut(id) else {
            return;
        };
        if node.attached {
            return;
        }
        node.attached = true;
        node.context = None;
        debug!(control = node.control.type_name(), "attach");

        let control = &*node.control;
        all_properties(control).activate_all();
        let mut subscriptions = Vec::new();
        let work = self.work.clone();
        subscriptions.push(
            control
                .base()
                .template
                .subscribe(move || work.push(Work::Visualize(id))),
        );
        let work = self.work.clone();
        subscriptions.push(
            control
                .base()
                .style
                .subscribe(move || work.push(Work::Restyle(id))),
        );
        for dependency in control.visual_dependencies() {
            let work = self.work.clone();
            subscriptions.push(dependency.subscribe(Rc::new(move || {
                work.push(Work::Visualize(id));
            })));
        }
        node.subscriptions = subscriptions;
        let children = node.children.clone();

        for child in children {
            self.attach(child);
        }
        self.visualize(id);
    }

    fn detach(&mut self, id: ControlId) {
        let Some(node) = self.controls.get(id) else {
            return;
        };
        if !node.attached {
            return;
        }
        debug!(control = node.control.type_name(), "detach");
        let children = node.children.clone();
        for child in children {
            self.detach(child);
        }

        let Some(node) = self.controls.get_mut(id) else {
            return;
        };
        node.attached = false;
        node.context = None;
        node.host = None;
        node.subscriptions.clear();
        let visualization = node.visualization.take();
        all_properties(&*node.control).deactivate_all();
        self.work.forget(id);
        if let Some(visual) = visualization {
            self.visuals.destroy(visual);
        }
    }

    // -- visualization ------------------------------------------------------

    /// Throw away the current visualization and build a new one: restyle,
    /// apply the template, anchor the result and put it in place.
    fn visualize(&mut self, id: ControlId) {
        let Some(node) = self.controls.get_mut(id) else {
            return;
        };
        if !node.attached {
            return;
        }
        let _span = debug_span!("visualize", control = node.control.type_name()).entered();
        let old = node.visualization.take();
        node.host = None;
        if let Some(old) = old {
            self.visuals.destroy(old);
        }

        self.restyle(id);
        let context = self.context_of(id);
        let Some(node) = self.controls.get(id) else {
            return;
        };
        let template = node.control.base().template.get();
        let mut cx = TemplateCx::new(&mut self.visuals, &context, id);
        let visual = template.apply(&*node.control, &mut cx);
        let host = cx.host();

        self.work.cancel(Work::Visualize(id));
        self.visuals.set_anchor(visual, Some(id));
        if let Some(node) = self.controls.get_mut(id) {
            node.visualization = Some(visual);
            node.host = host;
        }
        self.place(id);
        self.sync_host(id);
    }

    /// Parent the visualization of `id`: under the canvas visual for the
    /// root, under the parent's host otherwise.
    fn place(&mut self, id: ControlId) {
        let Some(node) = self.controls.get(id) else {
            return;
        };
        if node.visualization.is_none() {
            return;
        }
        if self.root == Some(id) {
            let visual = node.visualization.into_iter().collect::<Vec<_>>();
            if let Err(error) = self.visuals.set_children(self.root_visual, &visual) {
                warn!(%error, "could not place the root visualization");
            }
        } else if let Some(parent) = node.parent {
            self.sync_host(parent);
        }
    }

    /// Make the host's visual children equal the children's visualizations.
    fn sync_host(&mut self, id: ControlId) {
        let Some(node) = self.controls.get(id) else {
            return;
        };
        let Some(host) = node.host else {
            return;
        };
        let visuals: Vec<VisualId> = node
            .children
            .iter()
            .filter_map(|&child| self.controls.get(child)?.visualization)
            .collect();
        if let Err(error) = self.visuals.set_children(host, &visuals) {
            warn!(%error, control = node.control.type_name(), "children host out of sync");
        }
    }

    /// Resolve the rules that apply to `id` (context rules outermost first,
    /// then its local style) and assign or clear the style binding of every
    /// property.
    fn restyle(&mut self, id: ControlId) {
        let context = self.context_of(id);
        let Some(node) = self.controls.get(id) else {
            return;
        };
        let control = &*node.control;
        let mut rules = context.styling_for(control.as_any().type_id());
        if let Some(local) = control.base().style.get() {
            rules.push(local);
        }
        debug!(control = control.type_name(), rules = rules.len(), "restyle");
        StyleResolution::resolve(control.as_any(), &rules).apply(&all_properties(control));
    }

    // -- children -----------------------------------------------------------

    fn is_ancestor_or_self(&self, candidate: ControlId, of: ControlId) -> bool {
        let mut cursor = Some(of);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Fail unless `parent` may hold `count` children through the
    /// structural API.
    fn check_structure(&self, parent: ControlId, count: usize) -> Result<()> {
        let node = self.node(parent)?;
        if node.bound.is_some() {
            return Err(Error::Unsupported(
                "structural change on a bound children collection",
            ));
        }
        let model = node.control.child_model();
        if !model.accepts(count) {
            return Err(Error::ChildModel {
                control: node.control.type_name(),
                requested: match model {
                    ChildModel::None => "children",
                    _ => "another child",
                },
            });
        }
        Ok(())
    }

    /// Fail unless `child` is free to be placed under `parent`.
    fn check_orphan(&self, parent: ControlId, child: ControlId) -> Result<()> {
        let node = self.node(child)?;
        if node.parent.is_some() || self.root == Some(child) || self.is_ancestor_or_self(child, parent)
        {
            return Err(Error::AlreadyParented);
        }
        Ok(())
    }

    fn link(&mut self, parent: ControlId, index: usize, child: ControlId) {
        let Some(node) = self.controls.get_mut(parent) else {
            return;
        };
        node.children.insert(index, child);
        let attached = node.attached;
        if let Some(node) = self.controls.get_mut(child) {
            node.parent = Some(parent);
            node.context = None;
        }
        if attached {
            self.attach(child);
        }
    }

    fn unlink(&mut self, parent: ControlId, index: usize) -> Option<ControlId> {
        let node = self.controls.get_mut(parent)?;
        if index >= node.children.len() {
            return None;
        }
        let child = node.children.remove(index);
        self.detach(child);
        if let Some(node) = self.controls.get_mut(child) {
            node.parent = None;
            node.context = None;
        }
        self.sync_host(parent);
        Some(child)
    }

    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    pub fn insert_child(&mut self, parent: ControlId, index: usize, child: ControlId) -> Result<()> {
        let len = self.node(parent)?.children.len();
        self.check_structure(parent, len + 1)?;
        self.check_orphan(parent, child)?;
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.link(parent, index, child);
        self.flush();
        Ok(())
    }

    /// Remove `child` from `parent`. Returns whether it was a child.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<bool> {
        let node = self.node(parent)?;
        let Some(index) = node.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        self.remove_child_at(parent, index)?;
        Ok(true)
    }

    pub fn remove_child_at(&mut self, parent: ControlId, index: usize) -> Result<ControlId> {
        let len = self.node(parent)?.children.len();
        self.check_structure(parent, len.saturating_sub(1))?;
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let child = self
            .unlink(parent, index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        self.flush();
        Ok(child)
    }

    /// Put `child` at `index` in place of the current child there, which is
    /// returned detached and parentless.
    pub fn replace_child(&mut self, parent: ControlId, index: usize, child: ControlId) -> Result<ControlId> {
        let len = self.node(parent)?.children.len();
        self.check_structure(parent, len)?;
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.check_orphan(parent, child)?;
        let old = self
            .unlink(parent, index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        self.link(parent, index, child);
        self.flush();
        Ok(old)
    }

    /// Replace all children with `child` (or with nothing).
    pub fn set_child(&mut self, parent: ControlId, child: Option<ControlId>) -> Result<()> {
        let current = self.node(parent)?.children.clone();
        if let Some(child) = child {
            if current == [child] {
                return Ok(());
            }
            self.check_structure(parent, 1)?;
            self.check_orphan(parent, child)?;
        } else {
            self.check_structure(parent, 0)?;
        }
        for index in (0..current.len()).rev() {
            self.unlink(parent, index);
        }
        if let Some(child) = child {
            self.link(parent, 0, child);
        }
        self.flush();
        Ok(())
    }

    pub fn clear_children(&mut self, parent: ControlId) -> Result<()> {
        self.set_child(parent, None)
    }

    /// Let `list` own the children of `parent`. Current children are removed;
    /// from now on the children follow the list and the structural methods
    /// fail with [`Error::Unsupported`] until
    /// [`unbind_children`](Self::unbind_children).
    ///
    /// Entries that do not exist or already have another parent are skipped
    /// with a warning.
    pub fn bind_children(&mut self, parent: ControlId, list: ListSlot<ControlId>) -> Result<()> {
        let node = self.node(parent)?;
        if node.control.child_model() != ChildModel::Multiple {
            return Err(Error::ChildModel {
                control: node.control.type_name(),
                requested: "a children collection",
            });
        }
        self.unbind_children(parent)?;
        self.set_child(parent, None)?;

        let work = self.work.clone();
        let changes = list.subscribe_changes(move |_| work.push(Work::SyncChildren(parent)));
        if let Some(node) = self.controls.get_mut(parent) {
            node.bound = Some(BoundChildren {
                list,
                _changes: changes,
            });
        }
        self.sync_children(parent);
        self.flush();
        Ok(())
    }

    /// Stop following the bound collection; the current children stay.
    pub fn unbind_children(&mut self, parent: ControlId) -> Result<()> {
        self.controls
            .get_mut(parent)
            .ok_or(Error::UnknownControl)?
            .bound = None;
        Ok(())
    }

    pub fn is_bound(&self, parent: ControlId) -> bool {
        self.controls.get(parent).is_some_and(|n| n.bound.is_some())
    }

    fn sync_children(&mut self, parent: ControlId) {
        let Some(node) = self.controls.get(parent) else {
            return;
        };
        let Some(bound) = &node.bound else {
            return;
        };
        let mut desired: Vec<ControlId> = Vec::new();
        for id in bound.list.to_vec() {
            let usable = match self.controls.get(id) {
                None => false,
                Some(child) => {
                    !matches!(child.parent, Some(p) if p != parent)
                        && self.root != Some(id)
                        && !desired.contains(&id)
                        && !self.is_ancestor_or_self(id, parent)
                }
            };
            if usable {
                desired.push(id);
            } else {
                warn!(control = node.control.type_name(), "bound child skipped");
            }
        }
        let old = node.children.clone();
        let attached = node.attached;
        trace!(old = old.len(), new = desired.len(), "sync bound children");

        for &child in &old {
            if !desired.contains(&child) {
                self.detach(child);
                if let Some(node) = self.controls.get_mut(child) {
                    node.parent = None;
                    node.context = None;
                }
            }
        }
        if let Some(node) = self.controls.get_mut(parent) {
            node.children = desired.clone();
        }
        for &child in &desired {
            if old.contains(&child) {
                continue;
            }
            if let Some(node) = self.controls.get_mut(child) {
                node.parent = Some(parent);
                node.context = None;
            }
            if attached {
                self.attach(child);
            }
        }
        self.sync_host(parent);
    }

    /// Remove `id` and all its descendants from the `Ui`.
    pub fn remove_control(&mut self, id: ControlId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if self.root == Some(id) {
            self.root = None;
        }
        self.detach(id);
        if let Some(parent) = parent {
            if let Some(node) = self.controls.get_mut(parent) {
                node.children.retain(|&c| c != id);
            }
            self.sync_host(parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.controls.remove(current) {
                stack.extend(node.children);
            }
        }
        self.flush();
        Ok(())
    }

    // -- passes -------------------------------------------------------------

    /// Drain queued work until the trees are consistent, then apply pending
    /// visual invalidations.
    pub fn flush(&mut self) {
        let mut steps = 0;
        while let Some(work) = self.work.pop() {
            steps += 1;
            if steps > FLUSH_LIMIT {
                warn!(remaining = self.work.len(), "work queue did not settle; dropping");
                self.work.clear();
                break;
            }
            trace!(?work, "flush");
            match work {
                Work::Visualize(id) => self.visualize(id),
                Work::Restyle(id) => {
                    if self.is_attached(id) {
                        self.restyle(id);
                    }
                }
                Work::SyncChildren(id) => self.sync_children(id),
            }
        }
        self.visuals.apply_pending();
    }

    /// Whether nothing is waiting for [`flush`](Self::flush).
    pub fn is_settled(&self) -> bool {
        self.work.is_empty() && !self.visuals.has_pending()
    }

    /// Flush, then measure and arrange the whole visual tree into `size`.
    pub fn update_layout(
        &mut self,
        size: Size,
        renderer: Option<&mut (dyn Renderer + 'static)>,
    ) {
        self.flush();
        self.visuals.update_layout(self.root_visual, size, renderer);
    }

    /// Paint the whole visual tree.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        self.visuals.render(self.root_visual, renderer);
    }

    /// Outline of the visual tree.
    pub fn dump(&self) -> String {
        self.visuals.dump(self.root_visual)
    }

    /// Outline of the control tree under `id`.
    pub fn dump_controls(&self, id: ControlId) -> String {
        let mut out = String::new();
        self.dump_control_into(id, 0, &mut out);
        out
    }

    fn dump_control_into(&self, id: ControlId, depth: usize, out: &mut String) {
        let Some(node) = self.controls.get(id) else {
            return;
        };
        let _ = write!(out, "{:indent$}{}", "", node.control.type_name(), indent = depth * 2);
        if node.attached {
            out.push_str(" attached");
        }
        if node.bound.is_some() {
            out.push_str(" bound");
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_control_into(child, depth + 1, out);
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(Resources::new())
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("controls", &self.controls.len())
            .field("visuals", &self.visuals.len())
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Decorator, Label, StackPanel, Template};
    use crate::visual::Dirty;
    use crate::render::{Brush, Color};
    use crate::style::Style;
    use pretty_assertions::assert_eq;

    fn label(ui: &mut Ui, text: &str) -> ControlId {
        ui.add(Label::new(text))
    }

    #[test]
    fn attaching_the_root_visualizes_it() {
        let mut ui = Ui::default();
        let id = label(&mut ui, "a");
        assert!(!ui.is_attached(id));
        assert_eq!(ui.visualization(id), None);

        ui.set_root(Some(id)).unwrap();
        let visual = ui.visualization(id).unwrap();
        assert!(ui.is_attached(id));
        assert_eq!(ui.visuals().anchor(visual), Some(id));
        assert_eq!(ui.visuals().children(ui.root_visual()), &[visual]);

        ui.set_root(None).unwrap();
        assert!(!ui.is_attached(id));
        assert_eq!(ui.visualization(id), None);
        assert!(!ui.visuals().contains(visual));
        assert!(ui.visuals().children(ui.root_visual()).is_empty());
    }

    #[test]
    fn replacing_the_root_detaches_the_old_one() {
        let mut ui = Ui::default();
        let a = label(&mut ui, "a");
        let b = label(&mut ui, "b");
        ui.set_root(Some(a)).unwrap();
        ui.set_root(Some(b)).unwrap();
        assert!(!ui.is_attached(a));
        assert!(ui.contains(a));
        let visual = ui.visualization(b).unwrap();
        assert_eq!(ui.visuals().children(ui.root_visual()), &[visual]);
    }

    #[test]
    fn children_are_mirrored_in_the_host() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        let b = label(&mut ui, "b");
        ui.set_root(Some(panel)).unwrap();
        ui.add_child(panel, a).unwrap();
        ui.add_child(panel, b).unwrap();

        let host = ui.host(panel).unwrap();
        let (va, vb) = (ui.visualization(a).unwrap(), ui.visualization(b).unwrap());
        assert_eq!(ui.visuals().children(host), &[va, vb]);

        assert!(ui.remove_child(panel, a).unwrap());
        assert_eq!(ui.visuals().children(host), &[vb]);
        assert!(!ui.is_attached(a));
        assert_eq!(ui.parent(a), None);
        assert!(!ui.remove_child(panel, a).unwrap());
    }

    #[test]
    fn children_of_detached_parents_stay_unvisualized() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        ui.add_child(panel, a).unwrap();
        assert_eq!(ui.visualization(a), None);

        ui.set_root(Some(panel)).unwrap();
        assert!(ui.visualization(a).is_some());
    }

    #[test]
    fn child_model_is_enforced() {
        let mut ui = Ui::default();
        let text = label(&mut ui, "a");
        let other = label(&mut ui, "b");
        assert_eq!(
            ui.add_child(text, other),
            Err(Error::ChildModel { control: "Label", requested: "children" })
        );

        let decorator = ui.add(Decorator::default());
        ui.add_child(decorator, text).unwrap();
        assert_eq!(
            ui.add_child(decorator, other),
            Err(Error::ChildModel { control: "Decorator", requested: "another child" })
        );

        ui.set_child(decorator, Some(other)).unwrap();
        assert_eq!(ui.children(decorator), &[other]);
        assert_eq!(ui.parent(text), None);
    }

    #[test]
    fn a_child_has_one_parent() {
        let mut ui = Ui::default();
        let first = ui.add(StackPanel::vertical());
        let second = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        ui.add_child(first, a).unwrap();
        assert_eq!(ui.add_child(second, a), Err(Error::AlreadyParented));
        assert_eq!(ui.add_child(first, first), Err(Error::AlreadyParented));
        ui.add_child(second, first).unwrap();
        assert_eq!(ui.add_child(first, second), Err(Error::AlreadyParented));
    }

    #[test]
    fn index_errors() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        assert_eq!(
            ui.insert_child(panel, 1, a),
            Err(Error::IndexOutOfRange { index: 1, len: 0 })
        );
        assert_eq!(
            ui.remove_child_at(panel, 0),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn replace_child_returns_the_old_one() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        let b = label(&mut ui, "b");
        ui.set_root(Some(panel)).unwrap();
        ui.add_child(panel, a).unwrap();
        assert_eq!(ui.replace_child(panel, 0, b), Ok(a));
        assert_eq!(ui.children(panel), &[b]);
        assert!(!ui.is_attached(a));
        assert!(ui.is_attached(b));
    }

    #[test]
    fn bound_children_follow_the_list() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        ui.set_root(Some(panel)).unwrap();
        let a = label(&mut ui, "a");
        let b = label(&mut ui, "b");

        let list = ListSlot::new();
        ui.bind_children(panel, list.clone()).unwrap();
        assert!(ui.is_bound(panel));
        list.push(a).unwrap();
        list.push(b).unwrap();
        ui.flush();
        assert_eq!(ui.children(panel), &[a, b]);
        assert!(ui.is_attached(b));

        assert!(matches!(ui.add_child(panel, a), Err(Error::Unsupported(_))));

        list.remove(0).unwrap();
        ui.flush();
        assert_eq!(ui.children(panel), &[b]);
        assert!(!ui.is_attached(a));
        let host = ui.host(panel).unwrap();
        assert_eq!(ui.visuals().children(host), &[ui.visualization(b).unwrap()]);

        ui.unbind_children(panel).unwrap();
        list.clear().unwrap();
        ui.flush();
        assert_eq!(ui.children(panel), &[b]);
    }

    #[test]
    fn binding_children_requires_a_collection() {
        let mut ui = Ui::default();
        let decorator = ui.add(Decorator::default());
        assert_eq!(
            ui.bind_children(decorator, ListSlot::new()),
            Err(Error::ChildModel {
                control: "Decorator",
                requested: "a children collection",
            })
        );
    }

    #[test]
    fn style_precedence() {
        let resources = Resources::new()
            .with_style(Style::<Label>::new().set_value(|l| &l.foreground, Brush::from(Color::RED)));
        let mut ui = Ui::new(resources);
        let panel = ui.add(StackPanel::vertical());
        let text = label(&mut ui, "a");
        ui.add_child(panel, text).unwrap();
        ui.set_root(Some(panel)).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::from(Color::RED));

        let inner = Resources::new()
            .with_style(Style::<Label>::new().set_value(|l| &l.foreground, Brush::from(Color::BLUE)));
        ui.set_resources(panel, Some(inner)).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::from(Color::BLUE));

        let local = Style::<Label>::new()
            .set_value(|l| &l.foreground, Brush::from(Color::GREEN))
            .erase();
        ui.update(text, |l: &Label| l.base().style.set_value(Some(local))).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::from(Color::GREEN));

        ui.update(text, |l: &Label| l.foreground.set_value(Brush::None)).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::None);

        ui.update(text, |l: &Label| l.foreground.clear()).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::from(Color::GREEN));

        ui.update(text, |l: &Label| l.base().style.set_value(None)).unwrap();
        assert_eq!(ui.control::<Label>(text).unwrap().foreground.get(), Brush::from(Color::BLUE));
    }

    #[test]
    fn typed_access_checks_the_type() {
        let mut ui = Ui::default();
        let text = label(&mut ui, "a");
        assert!(matches!(
            ui.control::<StackPanel>(text),
            Err(Error::ControlType { actual: "Label", .. })
        ));
        assert_eq!(ui.type_name(text), Some("Label"));
    }

    #[test]
    fn removing_a_control_removes_its_subtree() {
        let mut ui = Ui::default();
        let panel = ui.add(StackPanel::vertical());
        let a = label(&mut ui, "a");
        ui.add_child(panel, a).unwrap();
        ui.set_root(Some(panel)).unwrap();
        let visuals = ui.visuals().len();
        assert!(visuals > 1);

        ui.remove_control(panel).unwrap();
        assert!(!ui.contains(panel));
        assert!(!ui.contains(a));
        assert_eq!(ui.root(), None);
        assert_eq!(ui.visuals().len(), 1);
        assert!(ui.is_settled());
    }

    #[test]
    fn template_writes_wait_for_the_next_flush() {
        let mut ui = Ui::default();
        let id = label(&mut ui, "a");
        ui.set_root(Some(id)).unwrap();
        let before = ui.visualization(id).unwrap();

        let frame = Template::new(|_: &Label, cx| cx.insert(Frame::new()));
        ui.control::<Label>(id).unwrap().base().template.set_value(frame);
        assert_eq!(ui.visualization(id), Some(before));
        assert!(!ui.is_settled());

        ui.flush();
        let after = ui.visualization(id).unwrap();
        assert_ne!(after, before);
        assert_eq!(ui.visuals().type_name(after), Some("Frame"));
        assert!(!ui.visuals().contains(before));
    }

    #[test]
    fn invalidation_reaches_the_canvas_visual() {
        let mut ui = Ui::default();
        let id = label(&mut ui, "a");
        ui.set_root(Some(id)).unwrap();
        ui.update_layout(Size::new(10.0, 1.0), None);
        let visual = ui.visualization(id).unwrap();
        assert!(!ui.visuals().dirty(ui.root_visual()).contains(Dirty::ARRANGE));

        ui.invalidate(visual, Invalidation::Arrange);
        assert!(ui.visuals().dirty(visual).contains(Dirty::ARRANGE));
        assert!(ui.visuals().dirty(ui.root_visual()).contains(Dirty::ARRANGE));
        assert!(!ui.visuals().dirty(visual).contains(Dirty::MEASURE));
    }
}
