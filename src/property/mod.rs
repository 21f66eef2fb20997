//! Properties: three-tier resolved values owned by controls and visuals.
//!
//! - [`Property`] — local > style > default, cached while active.
//! - [`VisualProperty`] — a property that invalidates its visual on change.
//! - [`PropertyList`] — erased view used by styling and attach/detach.

pub mod cell;
pub mod erased;

pub use cell::{Property, PropertyKey};
pub use erased::{AnyProperty, Invalidation, PropertyList, VisualProperty};
