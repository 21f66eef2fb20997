//! Label: a control that shows a string.

use std::any::Any;

use super::base::{Control, ControlBase};
use super::template::Template;
use crate::property::{Property, PropertyList};
use crate::render::{Brush, Color, Font};
use crate::visual::TextBlock;

/// Read-only text.
///
/// The default template is a single [`TextBlock`] whose text, font and
/// foreground follow the label's properties.
pub struct Label {
    base: ControlBase,
    pub text: Property<String>,
    pub font: Property<Font>,
    pub foreground: Property<Brush>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ControlBase::new(Self::default_template()),
            text: Property::new("Text", text.into()),
            font: Property::new("Font", Font::default()),
            foreground: Property::new("Foreground", Brush::Solid(Color::BLACK)),
        }
    }

    pub fn default_template() -> Template {
        Template::new(|label: &Label, cx| {
            let block = TextBlock::new("");
            block.text.set_binding(label.text.binding());
            block.font.set_binding(label.font.binding());
            block.foreground.set_binding(label.foreground.binding());
            cx.insert(block)
        })
    }
}

impl Control for Label {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with(&self.text)
            .with(&self.font)
            .with(&self.foreground)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_are_listed() {
        let label = Label::new("hi");
        assert_eq!(label.properties().len(), 3);
        assert_eq!(label.text.get(), "hi");
    }
}
