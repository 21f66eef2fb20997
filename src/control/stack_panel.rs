//! StackPanel: children stacked along one axis.

use std::any::Any;

use super::base::{ChildModel, Control, ControlBase};
use super::template::Template;
use crate::property::{Property, PropertyList};
use crate::visual::{LinearLayout, Orientation};

pub struct StackPanel {
    base: ControlBase,
    pub orientation: Property<Orientation>,
}

impl StackPanel {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: ControlBase::new(Self::default_template()),
            orientation: Property::new("Orientation", orientation),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// A [`LinearLayout`] hosting the children.
    pub fn default_template() -> Template {
        Template::new(|panel: &StackPanel, cx| {
            let layout = LinearLayout::default();
            layout.orientation.set_binding(panel.orientation.binding());
            let id = cx.insert(layout);
            cx.set_host(id);
            id
        })
    }
}

impl Control for StackPanel {
    fn type_name(&self) -> &'static str {
        "StackPanel"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn child_model(&self) -> ChildModel {
        ChildModel::Multiple
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new().with(&self.orientation)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
