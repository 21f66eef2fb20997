//! Styling: resource registries, the context chain and style rules.
//!
//! - [`Resources`] — styles per control type, templates per content type.
//! - [`Context`] — immutable scope chain built from control nesting.
//! - [`Style`] / [`StyleResolution`] — rules and their pure resolution.

pub mod context;
pub mod rule;

pub use context::{Context, Resources};
pub use rule::{ErasedStyle, Style, StyleResolution};
