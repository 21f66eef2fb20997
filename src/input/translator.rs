//! The seam between a platform input source and a [`Canvas`].

use super::event::{InputEvent, Key, Modifiers, PointerButton};
use crate::canvas::Canvas;
use crate::geometry::{Point, Vector};

/// Entry points a platform adapter calls with device-space input.
///
/// Every method builds the matching [`InputEvent`] and hands it to
/// [`Canvas::process_input`], which divides positions and deltas by the
/// canvas scale before dispatch. Adapters implement this trait and add a
/// method that decodes their platform's events into these calls.
pub trait InputTranslator {
    fn process_key_down(&mut self, canvas: &mut Canvas, key: Key, modifiers: Modifiers) -> bool {
        canvas.process_input(InputEvent::KeyDown { key, modifiers })
    }

    fn process_key_up(&mut self, canvas: &mut Canvas, key: Key, modifiers: Modifiers) -> bool {
        canvas.process_input(InputEvent::KeyUp { key, modifiers })
    }

    fn process_text(&mut self, canvas: &mut Canvas, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        canvas.process_input(InputEvent::Text(text.to_owned()))
    }

    fn process_pointer_down(
        &mut self,
        canvas: &mut Canvas,
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    ) -> bool {
        canvas.process_input(InputEvent::PointerDown {
            button,
            position,
            modifiers,
        })
    }

    fn process_pointer_up(
        &mut self,
        canvas: &mut Canvas,
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    ) -> bool {
        canvas.process_input(InputEvent::PointerUp {
            button,
            position,
            modifiers,
        })
    }

    fn process_pointer_move(&mut self, canvas: &mut Canvas, position: Point, delta: Vector) -> bool {
        canvas.process_input(InputEvent::PointerMove { position, delta })
    }

    fn process_scroll(&mut self, canvas: &mut Canvas, position: Point, delta: Vector) -> bool {
        canvas.process_input(InputEvent::Scroll { position, delta })
    }
}
