//! Input event types.
//!
//! Defines [`InputEvent`], [`Key`], [`Modifiers`], [`PointerButton`] and the
//! [`RoutedInput`] wrapper handed to visuals during dispatch. Platform events
//! are converted by an [`InputTranslator`](super::InputTranslator), so the
//! rest of the crate never depends on a platform crate.

use std::ops::{BitAnd, BitOr};

use crate::geometry::{Point, Vector};
use crate::visual::VisualId;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// PointerButton
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// An input event in layout coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        modifiers: Modifiers,
    },
    /// Committed text, delivered to the keyboard focus.
    Text(String),
    PointerDown {
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        delta: Vector,
    },
    Scroll {
        position: Point,
        delta: Vector,
    },
}

impl InputEvent {
    pub fn key_down(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_down(position: Point) -> Self {
        InputEvent::PointerDown {
            button: PointerButton::Left,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(position: Point) -> Self {
        InputEvent::PointerUp {
            button: PointerButton::Left,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Key and text events go to the keyboard focus.
    pub fn is_keyboard(&self) -> bool {
        matches!(
            self,
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } | InputEvent::Text(_)
        )
    }

    /// Position of a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerUp { position, .. }
            | InputEvent::PointerMove { position, .. }
            | InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Convert device coordinates to layout coordinates.
    pub fn unscale(self, factor: f32) -> Self {
        match self {
            InputEvent::PointerDown {
                button,
                position,
                modifiers,
            } => InputEvent::PointerDown {
                button,
                position: position.unscale(factor),
                modifiers,
            },
            InputEvent::PointerUp {
                button,
                position,
                modifiers,
            } => InputEvent::PointerUp {
                button,
                position: position.unscale(factor),
                modifiers,
            },
            InputEvent::PointerMove { position, delta } => InputEvent::PointerMove {
                position: position.unscale(factor),
                delta: delta.unscale(factor),
            },
            InputEvent::Scroll { position, delta } => InputEvent::Scroll {
                position: position.unscale(factor),
                delta: delta.unscale(factor),
            },
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// RoutedInput
// ---------------------------------------------------------------------------

/// Dispatch phase of a [`RoutedInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root to target, through `on_input_preview`.
    Tunnel,
    /// Target to root, through `on_input`.
    Bubble,
}

/// An event on its way along a route. Marking it handled stops dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedInput {
    event: InputEvent,
    source: VisualId,
    phase: Phase,
    handled: bool,
}

impl RoutedInput {
    pub(crate) fn new(event: InputEvent, source: VisualId) -> Self {
        Self {
            event,
            source,
            phase: Phase::Tunnel,
            handled: false,
        }
    }

    pub fn event(&self) -> &InputEvent {
        &self.event
    }

    /// The visual the route was built for.
    pub fn source(&self) -> VisualId {
        self.source
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Stop dispatch after the current handler.
    pub fn handle(&mut self) {
        self.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn keyboard_classification() {
        assert!(InputEvent::key_down(Key::Enter).is_keyboard());
        assert!(InputEvent::Text("a".into()).is_keyboard());
        assert!(!InputEvent::pointer_down(Point::ORIGIN).is_keyboard());
    }

    #[test]
    fn unscale_divides_positions_and_deltas() {
        let event = InputEvent::PointerMove {
            position: Point::new(10.0, 4.0),
            delta: Vector::new(2.0, -2.0),
        };
        assert_eq!(
            event.unscale(2.0),
            InputEvent::PointerMove {
                position: Point::new(5.0, 2.0),
                delta: Vector::new(1.0, -1.0),
            }
        );
    }

    #[test]
    fn unscale_leaves_keys_alone() {
        let event = InputEvent::key_down(Key::Tab);
        assert_eq!(event.clone().unscale(3.0), event);
    }

    #[test]
    fn position_of_pointer_events() {
        assert_eq!(
            InputEvent::pointer_up(Point::new(1.0, 2.0)).position(),
            Some(Point::new(1.0, 2.0))
        );
        assert_eq!(InputEvent::Text("x".into()).position(), None);
    }
}
