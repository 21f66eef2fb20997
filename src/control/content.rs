//! ContentControl: presents a single content value through a template.

use std::any::Any;

use super::base::{Control, ControlBase};
use super::template::{ContentTemplate, Template};
use crate::property::{Property, PropertyList};
use crate::reactive::Dependency;
use crate::visual::Frame;

/// Shows `content` using `content_template`, or the template the context
/// registers for `T` when no local one is set.
///
/// The visualization is a [`Frame`] with zero or one child. Changing the
/// content or the local template rebuilds it.
pub struct ContentControl<T: Clone + PartialEq + 'static> {
    base: ControlBase,
    pub content: Property<Option<T>>,
    pub content_template: Property<Option<ContentTemplate<T>>>,
}

impl<T: Clone + PartialEq + 'static> ContentControl<T> {
    pub fn new(content: Option<T>) -> Self {
        Self {
            base: ControlBase::new(Self::default_template()),
            content: Property::new("Content", content),
            content_template: Property::new("ContentTemplate", None),
        }
    }

    pub fn default_template() -> Template {
        Template::new(|control: &ContentControl<T>, cx| {
            let presenter = cx.insert(Frame::new());
            if let Some(content) = control.content.get() {
                let template = control.content_template.get();
                if let Some(child) = cx.present(&content, template.as_ref()) {
                    cx.append(presenter, child);
                }
            }
            presenter
        })
    }
}

impl<T: Clone + PartialEq + 'static> Control for ContentControl<T> {
    fn type_name(&self) -> &'static str {
        "ContentControl"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with(&self.content)
            .with(&self.content_template)
    }

    fn visual_dependencies(&self) -> Vec<Dependency> {
        vec![
            self.content.binding().dependency(),
            self.content_template.binding().dependency(),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
