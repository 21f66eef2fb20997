//! The visual tree: rendered nodes, box model, layout and painting.
//!
//! - [`VisualTree`] — arena of visuals with structure, dirty bits and
//!   layout results.
//! - [`Visual`] — behavior of one node (measure, arrange, render, input).
//! - [`LayoutCx`] / [`RenderCx`] — what a visual sees during each pass.
//! - Built-ins: [`Frame`], [`Rectangle`], [`LinearLayout`], [`TextBlock`].

pub mod box_model;
pub mod frame;
pub mod layout;
pub mod linear;
pub mod render;
pub mod text;
pub mod traits;
pub mod tree;

pub use box_model::{Dirty, HorizontalAlignment, LayoutProps, VerticalAlignment, DEFAULT_MINIMUM_SIZE};
pub use frame::{Frame, Rectangle};
pub use layout::LayoutCx;
pub use linear::{LinearLayout, Orientation};
pub use render::RenderCx;
pub use text::TextBlock;
pub use traits::Visual;
pub use tree::{VisualId, VisualTree};
