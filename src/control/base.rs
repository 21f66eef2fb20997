//! The `Control` trait and the state every control carries.

use std::any::Any;

use slotmap::new_key_type;

use super::template::Template;
use crate::property::{Property, PropertyList};
use crate::reactive::Dependency;
use crate::style::ErasedStyle;

new_key_type! {
    /// Handle to a control owned by a [`Ui`](super::Ui).
    pub struct ControlId;
}

/// How many logical children a control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChildModel {
    #[default]
    None,
    Single,
    Multiple,
}

impl ChildModel {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ChildModel::None => count == 0,
            ChildModel::Single => count <= 1,
            ChildModel::Multiple => true,
        }
    }
}

// ---------------------------------------------------------------------------
// ControlBase
// ---------------------------------------------------------------------------

/// Properties shared by every control.
///
/// `template` builds the visualization; changing its effective value while
/// the control is attached re-runs it. `style` is the control's local style
/// rule, applied after every rule its context supplies.
pub struct ControlBase {
    pub template: Property<Template>,
    pub style: Property<Option<ErasedStyle>>,
}

impl ControlBase {
    pub fn new(default_template: Template) -> Self {
        Self {
            template: Property::new("Template", default_template),
            style: Property::new("Style", None),
        }
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new().with(&self.template).with(&self.style)
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// A logical node: properties and children, independent of rendering.
///
/// A control never touches the visual tree directly. Its [`Template`]
/// produces a visualization when the control is attached, and the
/// [`Ui`](super::Ui) keeps it in sync.
pub trait Control: Any {
    /// Short name used in dumps and logs.
    fn type_name(&self) -> &'static str;

    fn base(&self) -> &ControlBase;

    fn child_model(&self) -> ChildModel {
        ChildModel::None
    }

    /// Properties of the concrete control, excluding the base ones. These
    /// are activated on attach and receive style assignments.
    fn properties(&self) -> PropertyList {
        PropertyList::new()
    }

    /// Changes of these sources re-run the template while attached.
    fn visual_dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;
}

/// Base and own properties of `control`.
pub(crate) fn all_properties(control: &dyn Control) -> PropertyList {
    control.base().properties().extend(control.properties())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_model_cardinality() {
        assert!(ChildModel::None.accepts(0));
        assert!(!ChildModel::None.accepts(1));
        assert!(ChildModel::Single.accepts(1));
        assert!(!ChildModel::Single.accepts(2));
        assert!(ChildModel::Multiple.accepts(40));
    }

    #[test]
    fn base_lists_template_and_style() {
        let base = ControlBase::new(Template::empty());
        let properties = base.properties();
        assert_eq!(properties.len(), 2);
        assert!(properties.contains(base.template.key()));
        assert!(properties.contains(base.style.key()));
    }
}
