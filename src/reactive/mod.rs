//! Reactive values: bindings, slots, list slots, subscriptions.
//!
//! Single-threaded and synchronous. Values are pulled with `get`; changes are
//! pushed to listeners that hold a [`Subscription`] token.
//!
//! - [`Binding`] — shared observable handle, with `map`/`map2` combinators.
//! - [`Slot`] / [`ReadOnlySlot`] — settable cell with equality suppression.
//! - [`ListSlot`] — observable list raising [`ListChange`] events.
//! - [`batch`] — group writes so derived values settle once.

pub mod binding;
pub mod list;
pub mod propagation;
pub mod slot;
pub mod subscription;

pub use binding::{Binding, Computed, Dependency, Observable};
pub use list::{ListChange, ListSlot};
pub use propagation::batch;
pub use slot::{ReadOnlySlot, Slot};
pub use subscription::{Listeners, Subscription};
