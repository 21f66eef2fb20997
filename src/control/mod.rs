//! Controls: the logical tree, templating, and the built-in controls.
//!
//! - [`Ui`] — arena of controls plus the [`VisualTree`](crate::visual::VisualTree)
//!   their templates build.
//! - [`Control`] / [`ControlBase`] — what every control provides.
//! - [`Template`] / [`ContentTemplate`] — builders of visual subtrees.
//! - Built-ins: [`Label`], [`Decorator`], [`StackPanel`], [`ContentControl`],
//!   [`Button`].

pub mod base;
pub mod button;
pub mod command;
pub mod content;
pub mod decorator;
pub mod label;
pub mod stack_panel;
pub mod template;
pub mod ui;
mod work;

pub use base::{ChildModel, Control, ControlBase, ControlId};
pub use button::{Button, ButtonVisual};
pub use command::Command;
pub use content::ContentControl;
pub use decorator::Decorator;
pub use label::Label;
pub use stack_panel::StackPanel;
pub use template::{ContentTemplate, ErasedContentTemplate, Template, TemplateCx};
pub use ui::Ui;
