//! Error types for the Ember engine core.

use thiserror::Error;

/// Top-level error type for Ember core operations.
///
/// Every recoverable failure surfaced by the pixel, asset, and particle
/// subsystems is one of these kinds. Callers that want a non-failing probe
/// use the `*_exists` / `try_*` forms instead of matching on errors.
#[derive(Debug, Error)]
pub enum EmberError {
    /// A resource name could not be located in the requested group or any
    /// group the search was permitted to fall back to.
    #[error("file not found: '{name}' in group '{group}'")]
    FileNotFound {
        /// Resource name that was looked up
        name: String,
        /// Group the lookup started in
        group: String,
    },

    /// A group, template, factory, or resource handle is unknown.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Creating a group/template/file that already exists.
    #[error("duplicate item: {0}")]
    DuplicateItem(String),

    /// Unknown type tag, or arguments that cannot describe a valid operation.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operation issued against an object in the wrong state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The requested conversion or pack path has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// IO errors propagated from archive streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Ember core operations.
pub type EmberResult<T> = Result<T, EmberError>;
