//! Routed input: events, routes, focus and the dispatching handler.
//!
//! Platform adapters implement [`InputTranslator`] and feed a
//! [`Canvas`](crate::canvas::Canvas); the canvas hands events to its
//! [`InputHandler`], which routes them through the visual tree.

pub mod cx;
pub mod event;
pub mod focus;
pub mod handler;
pub mod route;
pub mod translator;

#[cfg(feature = "crossterm")]
pub mod crossterm;

pub use cx::InputCx;
pub use event::{InputEvent, Key, Modifiers, Phase, PointerButton, RoutedInput};
pub use focus::{Focus, FocusTarget};
pub use handler::InputHandler;
pub use route::{Route, RoutePool, DEFAULT_POOL_CAPACITY};
pub use translator::InputTranslator;

#[cfg(feature = "crossterm")]
pub use self::crossterm::CrosstermTranslator;
