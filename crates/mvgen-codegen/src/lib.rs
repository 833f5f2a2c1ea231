//! Source generators for MVVM view binding.
//!
//! This crate implements:
//! - The binder generator (binding fields, converters, adapters, `BindMembers`)
//! - The internal union generator (union wrappers and their registry)
//! - Forwarding of `[field: ...]` attributes onto generated members
//! - A pipeline that runs both generators over one compilation
//!
//! ```ignore
//! let compilation = Compilation::builder("Game")
//!     .references(standard_references())
//!     .source("TextBinder.cs", text)
//!     .build()?;
//! let output = mvgen_codegen::generate(&compilation, &GeneratorConfig::default(), &CancellationToken::new())?;
//! ```

pub mod binder;
mod cancel;
pub mod constants;
pub mod diagnostics;
mod error;
mod forward;
mod generator;
pub mod model;
pub mod output;
mod pipeline;
mod printer;
pub mod scanner;
pub mod semantic;
pub mod union;

pub use binder::{BinderDeclaration, BinderGenerator};
pub use cancel::CancellationToken;
pub use error::{GeneratorError, Result};
pub use generator::{GeneratedSource, GeneratorOutput, SourceGenerator};
pub use output::write_sources;
pub use pipeline::generate;
pub use union::{InternalUnionDeclaration, InternalUnionGenerator};
