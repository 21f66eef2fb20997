//! Crossterm adapter.
//!
//! [`CrosstermTranslator`] turns crossterm terminal events into
//! [`InputTranslator`] calls, so the rest of the crate never depends on
//! crossterm directly. Terminal cells are the device unit.

use crossterm::event as ct;

use super::event::{Key, Modifiers, PointerButton};
use super::translator::InputTranslator;
use crate::canvas::Canvas;
use crate::geometry::{Point, Size, Vector};

/// Convert crossterm key modifiers to [`Modifiers`].
pub fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

/// Convert a crossterm key code. `None` for keys without a [`Key`].
pub fn convert_key(code: ct::KeyCode) -> Option<Key> {
    let key = match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::BackTab => Key::BackTab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        ct::KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

/// Convert a crossterm mouse button.
pub fn convert_button(b: ct::MouseButton) -> PointerButton {
    match b {
        ct::MouseButton::Left => PointerButton::Left,
        ct::MouseButton::Right => PointerButton::Right,
        ct::MouseButton::Middle => PointerButton::Middle,
    }
}

/// Feeds crossterm events into a [`Canvas`].
///
/// Key presses (and repeats) become key-down events; printable characters
/// without Ctrl or Alt are also delivered as text. Mouse motion carries the
/// delta from the previous pointer position. A terminal resize resizes the
/// canvas.
#[derive(Debug, Default)]
pub struct CrosstermTranslator {
    last_position: Option<Point>,
}

impl CrosstermTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one crossterm event. Returns whether a handler marked it
    /// handled.
    pub fn translate(&mut self, canvas: &mut Canvas, event: ct::Event) -> bool {
        match event {
            ct::Event::Key(key) => self.translate_key(canvas, key),
            ct::Event::Mouse(mouse) => self.translate_mouse(canvas, mouse),
            ct::Event::Resize(width, height) => {
                canvas.set_rendering_size(Size::new(f32::from(width), f32::from(height)));
                false
            }
            ct::Event::Paste(text) => self.process_text(canvas, &text),
            ct::Event::FocusGained | ct::Event::FocusLost => false,
        }
    }

    fn translate_key(&mut self, canvas: &mut Canvas, event: ct::KeyEvent) -> bool {
        let Some(key) = convert_key(event.code) else {
            return false;
        };
        let modifiers = convert_modifiers(event.modifiers);
        match event.kind {
            ct::KeyEventKind::Release => self.process_key_up(canvas, key, modifiers),
            ct::KeyEventKind::Press | ct::KeyEventKind::Repeat => {
                let handled = self.process_key_down(canvas, key, modifiers);
                match key {
                    Key::Char(c)
                        if !handled
                            && !modifiers.contains(Modifiers::CTRL)
                            && !modifiers.contains(Modifiers::ALT) =>
                    {
                        self.process_text(canvas, c.encode_utf8(&mut [0; 4]))
                    }
                    _ => handled,
                }
            }
        }
    }

    fn translate_mouse(&mut self, canvas: &mut Canvas, event: ct::MouseEvent) -> bool {
        let position = Point::new(f32::from(event.column), f32::from(event.row));
        let modifiers = convert_modifiers(event.modifiers);
        match event.kind {
            ct::MouseEventKind::Down(b) => {
                self.last_position = Some(position);
                self.process_pointer_down(canvas, convert_button(b), position, modifiers)
            }
            ct::MouseEventKind::Up(b) => {
                self.last_position = Some(position);
                self.process_pointer_up(canvas, convert_button(b), position, modifiers)
            }
            ct::MouseEventKind::Moved | ct::MouseEventKind::Drag(_) => {
                let delta = match self.last_position.replace(position) {
                    Some(last) => position - last,
                    None => Vector::ZERO,
                };
                self.process_pointer_move(canvas, position, delta)
            }
            ct::MouseEventKind::ScrollUp => {
                self.process_scroll(canvas, position, Vector::new(0.0, -1.0))
            }
            ct::MouseEventKind::ScrollDown => {
                self.process_scroll(canvas, position, Vector::new(0.0, 1.0))
            }
            ct::MouseEventKind::ScrollLeft => {
                self.process_scroll(canvas, position, Vector::new(-1.0, 0.0))
            }
            ct::MouseEventKind::ScrollRight => {
                self.process_scroll(canvas, position, Vector::new(1.0, 0.0))
            }
        }
    }
}

impl InputTranslator for CrosstermTranslator {}
