//! Core types for the mvgen source generators.
//!
//! This crate provides the foundational types used across the other mvgen crates:
//! - Declaration syntax trees and the node view used for candidate scanning
//! - Semantic symbols and the [`SemanticModel`] query trait
//! - Diagnostics with stable codes
//! - Backing-field naming rules
//! - Generator configuration and error types

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod names;
pub mod semantic;
pub mod symbols;
pub mod types;

pub use ast::*;
pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, DiagnosticDescriptor, Severity};
pub use errors::{ConfigError, ParseError};
pub use semantic::SemanticModel;
pub use symbols::*;
pub use types::*;
