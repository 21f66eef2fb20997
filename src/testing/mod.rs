//! Headless testing support: a recording renderer and the [`Pilot`].
//!
//! Use [`RecordingRenderer`] wherever a [`Renderer`](crate::render::Renderer)
//! is needed and inspect what was drawn; use the [`Pilot`] to drive a whole
//! canvas with scripted input.

pub mod pilot;
pub mod renderer;

pub use pilot::Pilot;
pub use renderer::{DrawCommand, RecordingRenderer};
