//! # weft
//!
//! The reactive core of a retained-mode UI toolkit.
//!
//! Controls declare typed [`Property`](property::Property) values that are
//! fed by local values, styles and [`Binding`](reactive::Binding)s. A control
//! is turned into visuals by its template; the visual tree measures,
//! arranges and paints itself through a backend [`Renderer`](render::Renderer),
//! and input is routed through it with tunnel and bubble phases.
//!
//! ## Core Systems
//!
//! - **[`reactive`]** — Observable slots and lists, bindings, RAII subscriptions
//! - **[`property`]** — Properties with local/style/default precedence
//! - **[`style`]** — Styles, resources and the inherited context
//! - **[`visual`]** — Visual tree arena, box-model layout, hit testing
//! - **[`control`]** — Controls, templates and the `Ui` that visualizes them
//! - **[`input`]** — Routed input, focus, route pooling, platform translators
//! - **[`canvas`]** — The top-level object a host drives
//! - **[`render`]** — Renderer contract, colors and brushes
//! - **[`testing`]** — Recording renderer and the `Pilot`
//! - **[`geometry`]** — Point, Vector, Size, Rect, Thickness

// Foundation
pub mod error;
pub mod geometry;

// Reactivity
pub mod property;
pub mod reactive;
pub mod style;

// Trees
pub mod control;
pub mod visual;

// Rendering and input
pub mod canvas;
pub mod input;
pub mod render;

// Headless testing
pub mod testing;

pub use canvas::{Canvas, CanvasConfig};
pub use error::{Error, Result};
