//! Focus: which visual (or control) receives a class of input.

use crate::control::{ControlId, Ui};
use crate::visual::VisualId;

/// What a [`Focus`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// A specific visual, for as long as it exists.
    Visual(VisualId),
    /// Whatever visualization the control currently has.
    Control(ControlId),
}

impl From<VisualId> for FocusTarget {
    fn from(id: VisualId) -> Self {
        FocusTarget::Visual(id)
    }
}

impl From<ControlId> for FocusTarget {
    fn from(id: ControlId) -> Self {
        FocusTarget::Control(id)
    }
}

/// A single focus slot. Holding a visual and holding a control are mutually
/// exclusive: setting one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    target: Option<FocusTarget>,
}

impl Focus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<FocusTarget> {
        self.target
    }

    pub fn is_set(&self) -> bool {
        self.target.is_some()
    }

    /// Focus `target`. Returns whether the focus changed.
    pub fn set(&mut self, target: impl Into<FocusTarget>) -> bool {
        let target = Some(target.into());
        let changed = self.target != target;
        self.target = target;
        changed
    }

    pub fn set_visual(&mut self, id: VisualId) -> bool {
        self.set(FocusTarget::Visual(id))
    }

    pub fn set_control(&mut self, id: ControlId) -> bool {
        self.set(FocusTarget::Control(id))
    }

    /// Clear the focus only if it currently holds exactly `target`.
    /// Returns whether it was cleared.
    pub fn unset(&mut self, target: impl Into<FocusTarget>) -> bool {
        if self.target == Some(target.into()) {
            self.target = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) -> bool {
        self.target.take().is_some()
    }

    /// The visual input should go to right now: the focused visual if it
    /// still exists, or the focused control's current visualization.
    pub fn resolve(&self, ui: &Ui) -> Option<VisualId> {
        match self.target? {
            FocusTarget::Visual(id) => ui.visuals().contains(id).then_some(id),
            FocusTarget::Control(id) => ui.visualization(id),
        }
    }
}
