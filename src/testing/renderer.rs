//! A renderer that records what it is asked to do.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{Rect, Size};
use crate::render::{Brush, Font, FormattedText, Renderer, TextOptions};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { rect: Rect, brush: Brush },
    Text { text: String, rect: Rect, brush: Brush },
}

#[derive(Debug, Default)]
struct Log {
    commands: Vec<DrawCommand>,
    texts_created: usize,
    texts_alive: usize,
    frames: usize,
    size: Option<Size>,
    scale: Option<f32>,
}

/// Headless [`Renderer`] with monospace metrics.
///
/// A line of text is `chars * font.size` wide and `font.size` high. Clones
/// share one log, so a test can keep a clone after handing the renderer to
/// a [`Canvas`](crate::canvas::Canvas). `begin_frame` clears the recorded
/// commands; draw calls outside a frame accumulate.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<Log>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls since the last `begin_frame`.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().commands.clone()
    }

    /// Recorded text draws, in order.
    pub fn texts(&self) -> Vec<String> {
        self.log
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                DrawCommand::Fill { .. } => None,
            })
            .collect()
    }

    /// How many formatted texts were ever created.
    pub fn texts_created(&self) -> usize {
        self.log.borrow().texts_created
    }

    /// How many formatted texts have not been dropped yet.
    pub fn texts_alive(&self) -> usize {
        self.log.borrow().texts_alive
    }

    /// Completed frames.
    pub fn frames(&self) -> usize {
        self.log.borrow().frames
    }

    pub fn last_size(&self) -> Option<Size> {
        self.log.borrow().size
    }

    pub fn last_scale(&self) -> Option<f32> {
        self.log.borrow().scale
    }

    pub fn clear(&self) {
        self.log.borrow_mut().commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn resize(&mut self, size: Size) {
        self.log.borrow_mut().size = Some(size);
    }

    fn scale(&mut self, factor: f32) {
        self.log.borrow_mut().scale = Some(factor);
    }

    fn create_formatted_text(
        &mut self,
        text: &str,
        font: &Font,
        _options: &TextOptions,
    ) -> Box<dyn FormattedText> {
        {
            let mut log = self.log.borrow_mut();
            log.texts_created += 1;
            log.texts_alive += 1;
        }
        Box::new(RecordedText {
            text: text.to_owned(),
            size: font.size,
            log: Rc::clone(&self.log),
        })
    }

    fn begin_frame(&mut self) {
        self.log.borrow_mut().commands.clear();
    }

    fn end_frame(&mut self) {
        self.log.borrow_mut().frames += 1;
    }

    fn fill_rectangle(&mut self, rect: Rect, brush: &Brush) {
        self.log
            .borrow_mut()
            .commands
            .push(DrawCommand::Fill { rect, brush: *brush });
    }
}

struct RecordedText {
    text: String,
    size: f32,
    log: Rc<RefCell<Log>>,
}

impl FormattedText for RecordedText {
    fn measure(&self, _available: Size) -> Size {
        let lines = self.text.lines().count().max(1);
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(longest as f32 * self.size, lines as f32 * self.size)
    }

    fn draw(&self, rect: Rect, brush: &Brush) {
        self.log.borrow_mut().commands.push(DrawCommand::Text {
            text: self.text.clone(),
            rect,
            brush: *brush,
        });
    }
}

impl Drop for RecordedText {
    fn drop(&mut self) {
        self.log.borrow_mut().texts_alive -= 1;
    }
}
