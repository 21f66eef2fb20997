//! Button: content that runs a command when clicked.

use std::any::Any;

use super::base::{Control, ControlBase};
use super::command::Command;
use super::template::{ContentTemplate, Template};
use crate::geometry::Thickness;
use crate::input::{InputCx, InputEvent, Key, PointerButton, RoutedInput};
use crate::property::{Invalidation, Property, PropertyList, VisualProperty};
use crate::reactive::{Binding, Dependency, Slot};
use crate::render::{Brush, Color};
use crate::visual::{RenderCx, Visual};

// ---------------------------------------------------------------------------
// ButtonVisual
// ---------------------------------------------------------------------------

/// The pressable surface of a [`Button`].
///
/// A left press captures the pointer and takes keyboard focus for the owning
/// control; the release executes the command only when it lands inside the
/// visual's bounds. Enter or Space executes while focused.
pub struct ButtonVisual {
    pub fill: VisualProperty<Brush>,
    pressed: Slot<bool>,
    command: Binding<Option<Command>>,
}

impl ButtonVisual {
    pub fn new(command: Binding<Option<Command>>) -> Self {
        Self {
            fill: VisualProperty::new("Fill", Brush::None, Invalidation::Render),
            pressed: Slot::new(false),
            command,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    /// Press state as a binding, for deriving the fill.
    pub fn pressed(&self) -> Binding<bool> {
        self.pressed.read_only().binding()
    }

    fn execute(&self) {
        if let Some(command) = self.command.get() {
            command.execute();
        }
    }
}

impl Visual for ButtonVisual {
    fn type_name(&self) -> &'static str {
        "ButtonVisual"
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new().with_visual(&self.fill)
    }

    fn render(&self, cx: &mut RenderCx<'_>) {
        let fill = self.fill.get();
        if fill.is_visible() {
            let bounds = cx.bounds();
            cx.renderer().fill_rectangle(bounds, &fill);
        }
    }

    fn on_input(&mut self, cx: &mut InputCx<'_>, input: &mut RoutedInput) {
        let handled = match input.event() {
            InputEvent::PointerDown {
                button: PointerButton::Left,
                ..
            } => {
                self.pressed.set(true);
                cx.capture_pointer();
                cx.focus_keyboard_anchor();
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Left,
                position,
                ..
            } if self.pressed.get() => {
                self.pressed.set(false);
                cx.release_pointer();
                if cx.bounds().contains(*position) {
                    self.execute();
                }
                true
            }
            InputEvent::KeyDown {
                key: Key::Enter | Key::Char(' '),
                ..
            } => {
                self.execute();
                true
            }
            _ => false,
        };
        if handled {
            input.handle();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A clickable control presenting `content`.
///
/// `background` is painted while released and `pressed_background` while a
/// press is in progress.
pub struct Button<T: Clone + PartialEq + 'static> {
    base: ControlBase,
    pub content: Property<Option<T>>,
    pub content_template: Property<Option<ContentTemplate<T>>>,
    pub command: Property<Option<Command>>,
    pub background: Property<Brush>,
    pub pressed_background: Property<Brush>,
    pub padding: Property<Thickness>,
}

impl<T: Clone + PartialEq + 'static> Button<T> {
    pub fn new(content: T) -> Self {
        Self {
            base: ControlBase::new(Self::default_template()),
            content: Property::new("Content", Some(content)),
            content_template: Property::new("ContentTemplate", None),
            command: Property::new("Command", None),
            background: Property::new("Background", Brush::Solid(Color::GREY)),
            pressed_background: Property::new("PressedBackground", Brush::Solid(Color::DARK_GREY)),
            padding: Property::new("Padding", Thickness::ZERO),
        }
    }

    pub fn with_command(self, command: Command) -> Self {
        self.command.set_value(Some(command));
        self
    }

    pub fn default_template() -> Template {
        Template::new(|button: &Button<T>, cx| {
            let visual = ButtonVisual::new(button.command.binding());
            let pressed = visual.pressed();
            let background = button.background.binding();
            let pressed_background = button.pressed_background.binding();
            let inputs = vec![
                pressed.dependency(),
                background.dependency(),
                pressed_background.dependency(),
            ];
            visual.fill.set_binding(Binding::function(
                move || {
                    if pressed.get() {
                        pressed_background.get()
                    } else {
                        background.get()
                    }
                },
                inputs,
            ));

            let id = cx.insert(visual);
            cx.layout(id).padding.set_binding(button.padding.binding());
            if let Some(content) = button.content.get() {
                let template = button.content_template.get();
                if let Some(child) = cx.present(&content, template.as_ref()) {
                    cx.append(id, child);
                }
            }
            id
        })
    }
}

impl<T: Clone + PartialEq + 'static> Control for Button<T> {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with(&self.content)
            .with(&self.content_template)
            .with(&self.command)
            .with(&self.background)
            .with(&self.pressed_background)
            .with(&self.padding)
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
