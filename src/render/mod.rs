//! Rendering contract: the renderer trait, formatted text, colors and brushes.

pub mod color;
pub mod renderer;

pub use color::{Brush, Color};
pub use renderer::{FormattedText, Font, Renderer, TextAlignment, TextOptions};
