//! Error types for source generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during a generation pass.
///
/// None of these reach the host as errors: the pass boundary turns them
/// into an internal-error diagnostic, except [`GeneratorError::Cancelled`].
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A matched declaration has no symbol in the semantic model.
    #[error("No symbol declared for '{0}'")]
    MissingSymbol(String),

    /// The pass was cancelled between candidates.
    #[error("Generation was cancelled")]
    Cancelled,

    /// A panic escaped while building or emitting a unit.
    #[error("{0}")]
    Panicked(String),

    /// Writing a generated unit failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
