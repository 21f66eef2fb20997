//! The contract a rendering backend implements.
//!
//! The core never draws pixels itself: visuals call into a [`Renderer`]
//! during the render pass, and text visuals hold [`FormattedText`] objects the
//! renderer created for them. Dropping a `FormattedText` releases whatever the
//! backend allocated for it.

use crate::geometry::{Rect, Size};

use super::color::Brush;

/// Font selection for formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans", 1.0)
    }
}

/// Horizontal placement of text lines within their rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How formatted text is laid out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextOptions {
    pub alignment: TextAlignment,
    /// Wrap at the available width instead of overflowing.
    pub wrap: bool,
}

/// Text shaped by a renderer, ready to measure and draw.
pub trait FormattedText {
    /// Size needed to show the text within `available`.
    fn measure(&self, available: Size) -> Size;

    /// Draw into `rect` with `brush`.
    fn draw(&self, rect: Rect, brush: &Brush);
}

/// A rendering backend.
pub trait Renderer {
    /// The drawing surface changed size (in device units).
    fn resize(&mut self, size: Size);

    /// The device-to-layout scale factor changed.
    fn scale(&mut self, factor: f32);

    /// Shape `text` for later measuring and drawing.
    fn create_formatted_text(
        &mut self,
        text: &str,
        font: &Font,
        options: &TextOptions,
    ) -> Box<dyn FormattedText>;

    /// Called before the first draw call of a frame.
    fn begin_frame(&mut self) {}

    /// Called after the last draw call of a frame.
    fn end_frame(&mut self) {}

    /// Fill `rect` (layout units) with `brush`.
    fn fill_rectangle(&mut self, rect: Rect, brush: &Brush);
}
