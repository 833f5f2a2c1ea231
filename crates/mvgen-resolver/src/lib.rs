//! Symbol binding for declaration source.
//!
//! This crate resolves:
//! - Type references (`List<Vector2>` -> a constructed symbol with substituted bases)
//! - Attribute references (`[BindingProperty]` -> `BindingPropertyAttribute`)
//! - Referenced assemblies, described as bundled metadata declarations

mod compilation;
mod error;
mod lookup;
mod metadata;
mod table;

pub use compilation::{Compilation, CompilationBuilder};
pub use error::CompilationError;
pub use metadata::{core_library, mvvm_library, standard_references, unity_engine, MetadataReference};
