//! What a visual sees while handling input.

use super::focus::FocusTarget;
use crate::control::ControlId;
use crate::geometry::Rect;
use crate::visual::{VisualId, VisualTree};

/// Focus changes requested by handlers, applied once dispatch finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusRequest {
    CapturePointer(FocusTarget),
    ReleasePointer(FocusTarget),
    FocusKeyboard(FocusTarget),
    BlurKeyboard(FocusTarget),
}

/// Handed to input hooks of the visual being called.
pub struct InputCx<'a> {
    id: VisualId,
    tree: &'a VisualTree,
    requests: &'a mut Vec<FocusRequest>,
}

impl<'a> InputCx<'a> {
    pub(crate) fn new(id: VisualId, tree: &'a VisualTree, requests: &'a mut Vec<FocusRequest>) -> Self {
        Self { id, tree, requests }
    }

    /// The visual being called.
    pub fn id(&self) -> VisualId {
        self.id
    }

    pub fn tree(&self) -> &VisualTree {
        self.tree
    }

    /// Arranged bounds of the visual being called.
    pub fn bounds(&self) -> Rect {
        self.tree.bounds(self.id)
    }

    /// The control owning the visual being called.
    pub fn anchor(&self) -> Option<ControlId> {
        self.tree.nearest_anchor(self.id).map(|(_, control)| control)
    }

    /// Route all pointer events to this visual until released.
    pub fn capture_pointer(&mut self) {
        self.requests
            .push(FocusRequest::CapturePointer(FocusTarget::Visual(self.id)));
    }

    /// Release a capture held by this visual.
    pub fn release_pointer(&mut self) {
        self.requests
            .push(FocusRequest::ReleasePointer(FocusTarget::Visual(self.id)));
    }

    /// Give keyboard focus to this visual.
    pub fn focus_keyboard(&mut self) {
        self.requests
            .push(FocusRequest::FocusKeyboard(FocusTarget::Visual(self.id)));
    }

    /// Give keyboard focus to the owning control, so it survives
    /// re-templating. Falls back to this visual when nothing owns it.
    pub fn focus_keyboard_anchor(&mut self) {
        let target = match self.anchor() {
            Some(control) => FocusTarget::Control(control),
            None => FocusTarget::Visual(self.id),
        };
        self.requests.push(FocusRequest::FocusKeyboard(target));
    }

    /// Drop keyboard focus if this visual or its owning control holds it.
    pub fn blur_keyboard(&mut self) {
        self.requests
            .push(FocusRequest::BlurKeyboard(FocusTarget::Visual(self.id)));
        if let Some(control) = self.anchor() {
            self.requests
                .push(FocusRequest::BlurKeyboard(FocusTarget::Control(control)));
        }
    }
}
