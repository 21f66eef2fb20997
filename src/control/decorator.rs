//! Decorator: one child on a filled, padded background.

use std::any::Any;

use super::base::{ChildModel, Control, ControlBase};
use super::template::Template;
use crate::geometry::Thickness;
use crate::property::{Property, PropertyList};
use crate::render::Brush;
use crate::visual::Rectangle;

pub struct Decorator {
    base: ControlBase,
    pub background: Property<Brush>,
    pub padding: Property<Thickness>,
}

impl Decorator {
    pub fn new() -> Self {
        Self {
            base: ControlBase::new(Self::default_template()),
            background: Property::new("Background", Brush::None),
            padding: Property::new("Padding", Thickness::ZERO),
        }
    }

    /// A [`Rectangle`] hosting the child.
    pub fn default_template() -> Template {
        Template::new(|decorator: &Decorator, cx| {
            let rectangle = Rectangle::new();
            rectangle.fill.set_binding(decorator.background.binding());
            let id = cx.insert(rectangle);
            cx.layout(id)
                .padding
                .set_binding(decorator.padding.binding());
            cx.set_host(id);
            id
        })
    }
}

impl Default for Decorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for Decorator {
    fn type_name(&self) -> &'static str {
        "Decorator"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn child_model(&self) -> ChildModel {
        ChildModel::Single
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with(&self.background)
            .with(&self.padding)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
