//! Error type shared by the tree, collections and bindings.
//!
//! Only programming errors surface here. Conditions like "no focus target"
//! or "no content" are defined no-ops and never produce an `Error`.

/// Errors returned by `weft` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An index was outside `0..len` (or `0..=len` for insertion).
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The operation is not supported by this collection or binding.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// The control's child model does not allow this child operation.
    #[error("{control} does not accept {requested}")]
    ChildModel {
        control: &'static str,
        requested: &'static str,
    },

    /// A `ControlId` that no longer exists (or never did).
    #[error("unknown control")]
    UnknownControl,

    /// A `VisualId` that no longer exists (or never did).
    #[error("unknown visual")]
    UnknownVisual,

    /// A typed accessor was used with the wrong control type.
    #[error("control is a {actual}, not a {expected}")]
    ControlType {
        expected: &'static str,
        actual: &'static str,
    },

    /// The control already has a parent (or is the canvas root).
    #[error("control already has a parent")]
    AlreadyParented,
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
