//! Arena-backed visual tree.
//!
//! Every visual lives in a `SlotMap` keyed by [`VisualId`]. The tree owns the
//! parent/child links, the box-model properties, the dirty bits and the last
//! layout results of each node; the node's [`Visual`] implementation only
//! supplies behavior.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use super::box_model::{Dirty, LayoutProps};
use super::traits::Visual;
use crate::control::ControlId;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use crate::property::{Invalidation, PropertyList};
use crate::reactive::Subscription;

new_key_type! {
    /// Handle to a visual in a [`VisualTree`].
    pub struct VisualId;
}

/// Invalidations raised by property listeners, applied on the next pass.
pub(crate) type PendingInvalidations = Rc<RefCell<Vec<(VisualId, Invalidation)>>>;

// ---------------------------------------------------------------------------
// VisualNode
// ---------------------------------------------------------------------------

pub(crate) struct VisualNode {
    /// Taken out while one of its hooks runs.
    pub(crate) visual: Option<Box<dyn Visual>>,
    type_name: &'static str,
    parent: Option<VisualId>,
    pub(crate) children: Vec<VisualId>,
    pub(crate) layout: LayoutProps,
    anchor: Option<ControlId>,
    is_root: bool,
    attached: bool,
    pub(crate) dirty: Dirty,
    /// Clamped size without margin.
    pub(crate) measured_size: Size,
    /// `measured_size` plus margin; what the parent lays out with.
    pub(crate) desired_size: Size,
    pub(crate) last_available: Option<Size>,
    /// Arranged rectangle (absolute, margin excluded).
    pub(crate) bounds: Rect,
    pub(crate) last_final: Option<Rect>,
    active_properties: Option<PropertyList>,
    subscriptions: Vec<Subscription>,
}

impl VisualNode {
    fn new(visual: Box<dyn Visual>) -> Self {
        Self {
            type_name: visual.type_name(),
            visual: Some(visual),
            parent: None,
            children: Vec::new(),
            layout: LayoutProps::new(),
            anchor: None,
            is_root: false,
            attached: false,
            dirty: Dirty::ALL,
            measured_size: Size::ZERO,
            desired_size: Size::ZERO,
            last_available: None,
            bounds: Rect::EMPTY,
            last_final: None,
            active_properties: None,
            subscriptions: Vec::new(),
        }
    }

    fn properties(&self) -> PropertyList {
        let own = self
            .visual
            .as_ref()
            .map(|v| v.properties())
            .unwrap_or_default();
        own.extend(self.layout.properties())
    }
}

// ---------------------------------------------------------------------------
// VisualTree
// ---------------------------------------------------------------------------

/// All visuals of one UI, with their structure and layout state.
pub struct VisualTree {
    pub(crate) nodes: SlotMap<VisualId, VisualNode>,
    pending: PendingInvalidations,
}

impl VisualTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Add a detached, parentless visual.
    pub fn insert(&mut self, visual: impl Visual) -> VisualId {
        self.insert_boxed(Box::new(visual))
    }

    pub fn insert_boxed(&mut self, visual: Box<dyn Visual>) -> VisualId {
        self.nodes.insert(VisualNode::new(visual))
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Typed access to a visual's behavior.
    pub fn get<V: Visual>(&self, id: VisualId) -> Option<&V> {
        self.nodes.get(id)?.visual.as_ref()?.as_any().downcast_ref()
    }

    pub fn get_mut<V: Visual>(&mut self, id: VisualId) -> Option<&mut V> {
        self.nodes
            .get_mut(id)?
            .visual
            .as_mut()?
            .as_any_mut()
            .downcast_mut()
    }

    pub fn type_name(&self, id: VisualId) -> Option<&'static str> {
        self.nodes.get(id).map(|n| n.type_name)
    }

    pub fn parent(&self, id: VisualId) -> Option<VisualId> {
        self.nodes.get(id)?.parent
    }

    pub fn children(&self, id: VisualId) -> &[VisualId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Box-model properties of `id`.
    pub fn layout(&self, id: VisualId) -> Option<&LayoutProps> {
        self.nodes.get(id).map(|n| &n.layout)
    }

    /// Arranged rectangle in canvas coordinates, margin excluded.
    pub fn bounds(&self, id: VisualId) -> Rect {
        self.nodes.get(id).map(|n| n.bounds).unwrap_or(Rect::EMPTY)
    }

    /// Measured size, margin excluded.
    pub fn measured_size(&self, id: VisualId) -> Size {
        self.nodes.get(id).map(|n| n.measured_size).unwrap_or(Size::ZERO)
    }

    /// Measured size plus margin.
    pub fn desired_size(&self, id: VisualId) -> Size {
        self.nodes.get(id).map(|n| n.desired_size).unwrap_or(Size::ZERO)
    }

    pub fn dirty(&self, id: VisualId) -> Dirty {
        self.nodes.get(id).map(|n| n.dirty).unwrap_or_default()
    }

    pub fn is_attached(&self, id: VisualId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.attached)
    }

    pub fn is_root(&self, id: VisualId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.is_root)
    }

    pub(crate) fn set_root(&mut self, id: VisualId, is_root: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.is_root = is_root;
        }
    }

    /// The control this visual is the visualization of, if any.
    pub fn anchor(&self, id: VisualId) -> Option<ControlId> {
        self.nodes.get(id)?.anchor
    }

    pub(crate) fn set_anchor(&mut self, id: VisualId, anchor: Option<ControlId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.anchor = anchor;
        }
    }

    /// The closest anchored visual at or above `id`, and its control.
    pub fn nearest_anchor(&self, id: VisualId) -> Option<(VisualId, ControlId)> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(current)?;
            if let Some(control) = node.anchor {
                return Some((current, control));
            }
            cursor = node.parent;
        }
        None
    }

    /// `id` followed by each of its ancestors.
    pub fn ancestors(&self, id: VisualId) -> impl Iterator<Item = VisualId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&v| self.parent(v))
    }

    fn is_ancestor_or_self(&self, candidate: VisualId, of: VisualId) -> bool {
        self.ancestors(of).any(|v| v == candidate)
    }

    // -- structure ----------------------------------------------------------

    pub fn append_child(&mut self, parent: VisualId, child: VisualId) -> Result<()> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert a parentless `child` under `parent` at `index`.
    pub fn insert_child(&mut self, parent: VisualId, index: usize, child: VisualId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(Error::UnknownVisual);
        }
        if self.parent(child).is_some() || self.is_ancestor_or_self(child, parent) {
            return Err(Error::AlreadyParented);
        }
        let len = self.children(parent).len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        let parent_attached = self.is_attached(parent);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if parent_attached {
            self.attach(child);
        }
        self.invalidate(parent, Invalidation::Measure);
        Ok(())
    }

    /// Unparent `child` from `parent` and detach it. The visual stays alive.
    pub fn remove_child(&mut self, parent: VisualId, child: VisualId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::UnknownVisual);
        }
        self.unlink(child);
        self.detach(child);
        self.invalidate(parent, Invalidation::Measure);
        Ok(())
    }

    /// Make `children` the exact child list of `parent`.
    ///
    /// Visuals currently under another parent are moved; previous children
    /// not in the new list are unparented and detached.
    pub fn set_children(&mut self, parent: VisualId, children: &[VisualId]) -> Result<()> {
        if !self.contains(parent) {
            return Err(Error::UnknownVisual);
        }
        for &child in children {
            if !self.contains(child) {
                return Err(Error::UnknownVisual);
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(Error::AlreadyParented);
            }
        }
        if self.children(parent) == children {
            return Ok(());
        }

        let old = self.children(parent).to_vec();
        for &child in &old {
            if !children.contains(&child) {
                self.unlink(child);
                self.detach(child);
            }
        }
        for &child in children {
            if self.parent(child).is_some_and(|p| p != parent) {
                self.unlink(child);
            }
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(parent);
            }
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children = children.to_vec();
        }
        if self.is_attached(parent) {
            for &child in children {
                self.attach(child);
            }
        }
        self.invalidate(parent, Invalidation::Measure);
        Ok(())
    }

    /// Remove `id` from its parent's child list. Returns the old parent.
    fn unlink(&mut self, id: VisualId) -> Option<VisualId> {
        let parent = self.nodes.get_mut(id)?.parent.take()?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        Some(parent)
    }

    /// Destroy `id` and its subtree.
    ///
    /// Descendants anchored to a different control than `id` belong to that
    /// control: they are unparented and kept.
    pub fn destroy(&mut self, id: VisualId) {
        let Some(owner) = self.nodes.get(id).map(|n| n.anchor) else {
            return;
        };
        if let Some(parent) = self.unlink(id) {
            self.invalidate(parent, Invalidation::Measure);
        }
        self.destroy_subtree(id, owner);
    }

    fn destroy_subtree(&mut self, id: VisualId, owner: Option<ControlId>) {
        let children = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            let foreign = self
                .nodes
                .get(child)
                .and_then(|n| n.anchor)
                .is_some_and(|anchor| Some(anchor) != owner);
            if foreign {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.parent = None;
                }
            } else {
                self.destroy_subtree(child, owner);
            }
        }
        if let Some(mut node) = self.nodes.remove(id) {
            node.subscriptions.clear();
            if let Some(properties) = node.active_properties.take() {
                properties.deactivate_all();
            }
        }
    }

    // -- attachment ---------------------------------------------------------

    /// Activate the properties of `id` and its subtree and start listening
    /// for invalidating property changes.
    pub(crate) fn attach(&mut self, id: VisualId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.attached {
            return;
        }
        node.attached = true;
        let properties = node.properties();
        properties.activate_all();

        let subscriptions = properties
            .iter()
            .filter(|(_, invalidation)| *invalidation != Invalidation::None)
            .map(|(property, invalidation)| {
                let pending = self.pending.clone();
                property.watch(Rc::new(move || {
                    pending.borrow_mut().push((id, invalidation));
                }))
            })
            .collect();
        let children = node.children.clone();
        node.subscriptions = subscriptions;
        node.active_properties = Some(properties);

        for child in children {
            self.attach(child);
        }
        self.invalidate(id, Invalidation::Measure);
    }

    /// Deactivate the properties of `id` and its subtree.
    pub(crate) fn detach(&mut self, id: VisualId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.attached {
            return;
        }
        node.attached = false;
        node.subscriptions.clear();
        if let Some(properties) = node.active_properties.take() {
            properties.deactivate_all();
        }
        let children = node.children.clone();
        for child in children {
            self.detach(child);
        }
    }

    // -- invalidation -------------------------------------------------------

    /// Raise the dirty bits implied by `invalidation` on `id` and every
    /// ancestor.
    pub fn invalidate(&mut self, id: VisualId, invalidation: Invalidation) {
        let bits = Dirty::implied_by(invalidation);
        if bits.is_clean() {
            return;
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get_mut(current) else {
                break;
            };
            node.dirty.insert(bits);
            cursor = node.parent;
        }
    }

    /// Apply invalidations queued by property listeners.
    pub fn apply_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for (id, invalidation) in pending {
            self.invalidate(id, invalidation);
        }
        count
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    // -- hooks --------------------------------------------------------------

    /// Run `f` with the visual of `id` taken out of the tree, so `f` may
    /// borrow the tree mutably. Returns `None` if `id` is gone or already
    /// taken.
    pub(crate) fn with_visual<R>(
        &mut self,
        id: VisualId,
        f: impl FnOnce(&mut dyn Visual, &mut Self) -> R,
    ) -> Option<R> {
        let mut visual = self.nodes.get_mut(id)?.visual.take()?;
        let result = f(visual.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(id) {
            node.visual = Some(visual);
        }
        Some(result)
    }

    // -- queries ------------------------------------------------------------

    /// Deepest visual under `point`, starting at `root`. At each level the
    /// last child containing the point wins. `None` when `root` itself does
    /// not contain it.
    pub fn hit_test(&self, root: VisualId, point: Point) -> Option<VisualId> {
        if !self.nodes.get(root)?.bounds.contains(point) {
            return None;
        }
        let mut current = root;
        'descend: loop {
            for &child in self.children(current).iter().rev() {
                if self.bounds(child).contains(point) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Indented outline of the subtree at `id`: type, bounds, anchor.
    pub fn dump(&self, id: VisualId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: VisualId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let b = node.bounds;
        let _ = write!(
            out,
            "{:indent$}{} ({},{} {}x{})",
            "",
            node.type_name,
            b.x,
            b.y,
            b.width,
            b.height,
            indent = depth * 2
        );
        if node.anchor.is_some() {
            out.push_str(" anchored");
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_into(child, depth + 1, out);
        }
    }
}

impl Default for VisualTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VisualTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualTree")
            .field("len", &self.nodes.len())
            .finish()
    }
}
