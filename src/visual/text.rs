//! TextBlock: a run of formatted text.

use std::any::Any;

use crate::geometry::Size;
use crate::property::{Invalidation, PropertyList, VisualProperty};
use crate::render::{Brush, Color, Font, FormattedText, TextOptions};

use super::layout::LayoutCx;
use super::render::RenderCx;
use super::traits::Visual;
use super::tree::VisualId;

struct Shaped {
    text: String,
    font: Font,
    options: TextOptions,
    formatted: Box<dyn FormattedText>,
}

/// Displays text shaped by the renderer.
///
/// The formatted text is created lazily during measure and recreated only
/// when the text, font or options change; it is dropped with the visual.
pub struct TextBlock {
    pub text: VisualProperty<String>,
    pub font: VisualProperty<Font>,
    pub options: VisualProperty<TextOptions>,
    pub foreground: VisualProperty<Brush>,
    shaped: Option<Shaped>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: VisualProperty::new("Text", text.into(), Invalidation::Measure),
            font: VisualProperty::new("Font", Font::default(), Invalidation::Measure),
            options: VisualProperty::new("TextOptions", TextOptions::default(), Invalidation::Measure),
            foreground: VisualProperty::new(
                "Foreground",
                Brush::Solid(Color::BLACK),
                Invalidation::Render,
            ),
            shaped: None,
        }
    }

    fn ensure_shaped(&mut self, cx: &mut LayoutCx<'_>) -> Option<&dyn FormattedText> {
        let text = self.text.get();
        let font = self.font.get();
        let options = self.options.get();
        let stale = match &self.shaped {
            Some(s) => s.text != text || s.font != font || s.options != options,
            None => true,
        };
        if stale {
            self.shaped = cx
                .create_text(&text, &font, &options)
                .map(|formatted| Shaped {
                    text,
                    font,
                    options,
                    formatted,
                });
        }
        self.shaped.as_ref().map(|s| s.formatted.as_ref())
    }

    /// Whether formatted text is currently held.
    pub fn is_shaped(&self) -> bool {
        self.shaped.is_some()
    }
}

impl Visual for TextBlock {
    fn type_name(&self) -> &'static str {
        "TextBlock"
    }

    fn properties(&self) -> PropertyList {
        PropertyList::new()
            .with_visual(&self.text)
            .with_visual(&self.font)
            .with_visual(&self.options)
            .with_visual(&self.foreground)
    }

    fn measure(&mut self, cx: &mut LayoutCx<'_>, _id: VisualId, available: Size) -> Size {
        match self.ensure_shaped(cx) {
            Some(formatted) => formatted.measure(available),
            None => Size::ZERO,
        }
    }

    fn render(&self, cx: &mut RenderCx<'_>) {
        if let Some(shaped) = &self.shaped {
            shaped.formatted.draw(cx.content_bounds(), &self.foreground.get());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
