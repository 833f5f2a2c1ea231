//! Error types shared across the mvgen crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors while reading declaration source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected token at line {line}, column {column}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: u32,
        column: u32,
    },

    #[error("Unterminated string starting at line {line}")]
    UnterminatedString { line: u32 },

    #[error("Unterminated comment starting at line {line}")]
    UnterminatedComment { line: u32 },

    #[error("Invalid character {found:?} at line {line}, column {column}")]
    InvalidCharacter { found: char, line: u32, column: u32 },

    #[error("Unbalanced '{delimiter}' opened at line {line}")]
    UnbalancedDelimiter { delimiter: char, line: u32 },

    #[error("Unexpected end of input")]
    UnexpectedEof,
}

/// Errors while loading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
