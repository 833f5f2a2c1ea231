//! Compilation errors.

use thiserror::Error;

use mvgen_core::ParseError;

/// Errors while assembling a compilation.
#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid metadata for assembly {assembly}: {source}")]
    Metadata {
        assembly: String,
        #[source]
        source: ParseError,
    },
}
