//! Pilot: scripted interaction with a headless [`Canvas`].
//!
//! The `Pilot` owns a canvas backed by a [`RecordingRenderer`] and offers
//! high-level input helpers (click, key press, typing) plus access to what
//! the last frame drew. Positions are in device units, like a real
//! platform adapter would deliver them.

use crate::canvas::{Canvas, CanvasConfig};
use crate::control::{Control, ControlId, Ui};
use crate::error::Result;
use crate::geometry::{Point, Vector};
use crate::input::{InputEvent, Key, Modifiers, PointerButton};
use crate::style::Resources;
use crate::visual::VisualId;

use super::renderer::{DrawCommand, RecordingRenderer};

/// A headless canvas driver for tests.
///
/// ```ignore
/// let mut pilot = Pilot::new(20.0, 5.0);
/// let button = pilot.mount(Button::new(Some("Ok".to_string())))?;
/// pilot.click_control(button);
/// ```
pub struct Pilot {
    canvas: Canvas,
    renderer: RecordingRenderer,
    pointer: Option<Point>,
}

impl Pilot {
    /// A pilot with a `width` x `height` canvas and no resources.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_resources(width, height, Resources::new())
    }

    pub fn with_resources(width: f32, height: f32, resources: Resources) -> Self {
        Self::with_config(CanvasConfig::new().with_size(width, height), resources)
    }

    pub fn with_config(config: CanvasConfig, resources: Resources) -> Self {
        let renderer = RecordingRenderer::new();
        Self {
            canvas: Canvas::with_config(renderer.clone(), resources, config),
            renderer,
            pointer: None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn ui(&self) -> &Ui {
        self.canvas.ui()
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        self.canvas.ui_mut()
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    /// Make `control` the root and render a first frame.
    pub fn mount<C: Control>(&mut self, control: C) -> Result<ControlId> {
        let id = self.canvas.mount(control)?;
        self.canvas.render();
        Ok(id)
    }

    /// Render a frame and return its draw calls.
    pub fn render(&mut self) -> Vec<DrawCommand> {
        self.canvas.render();
        self.renderer.commands()
    }

    /// Outline of the visual tree after layout.
    pub fn dump(&mut self) -> String {
        self.canvas.layout();
        self.canvas.ui().dump()
    }

    // -- pointer --------------------------------------------------------------

    pub fn move_to(&mut self, at: Point) -> bool {
        let delta = match self.pointer.replace(at) {
            Some(last) => at - last,
            None => Vector::ZERO,
        };
        self.canvas
            .process_input(InputEvent::PointerMove { position: at, delta })
    }

    pub fn press(&mut self, at: Point) -> bool {
        self.pointer = Some(at);
        self.canvas.process_input(InputEvent::PointerDown {
            button: PointerButton::Left,
            position: at,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn release(&mut self, at: Point) -> bool {
        self.pointer = Some(at);
        self.canvas.process_input(InputEvent::PointerUp {
            button: PointerButton::Left,
            position: at,
            modifiers: Modifiers::NONE,
        })
    }

    /// Press and release the left button at `at`. Returns whether either
    /// event was handled.
    pub fn click(&mut self, at: Point) -> bool {
        let down = self.press(at);
        let up = self.release(at);
        down || up
    }

    /// Center of `visual` in device units, after layout.
    pub fn center_of(&mut self, visual: VisualId) -> Point {
        self.canvas.layout();
        let center = self.canvas.ui().visuals().bounds(visual).center();
        let scale = self.canvas.scale();
        Point::new(center.x * scale, center.y * scale)
    }

    /// Click the center of the control's visualization. `false` when it has
    /// none.
    pub fn click_control(&mut self, id: ControlId) -> bool {
        self.canvas.layout();
        match self.canvas.ui().visualization(id) {
            Some(visual) => {
                let at = self.center_of(visual);
                self.click(at)
            }
            None => false,
        }
    }

    // -- keyboard -------------------------------------------------------------

    /// Key down then key up. Returns whether the key-down was handled.
    pub fn press_key(&mut self, key: Key) -> bool {
        let handled = self.canvas.process_input(InputEvent::key_down(key));
        self.canvas.process_input(InputEvent::KeyUp {
            key,
            modifiers: Modifiers::NONE,
        });
        handled
    }

    pub fn type_text(&mut self, text: &str) -> bool {
        self.canvas.process_input(InputEvent::Text(text.to_owned()))
    }
}

impl std::fmt::Debug for Pilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pilot")
            .field("canvas", &self.canvas)
            .field("pointer", &self.pointer)
            .finish()
    }
}
