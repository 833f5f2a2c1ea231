//! Parser for declaration source.
//!
//! This crate turns source text into the declaration-only [`SyntaxTree`]
//! used by the generators. Tokens are recognized with `nom`; the grammar
//! itself is a small recursive-descent parser over the token list.

mod grammar;
mod lexer;

pub use grammar::parse;

use mvgen_core::{ParseError, SyntaxTree};

/// Parse one source file.
///
/// # Example
///
/// ```ignore
/// use mvgen_parser::parse_source;
///
/// let tree = parse_source("Binder.cs", r#"
/// public partial class TextBinder : MonoBinder<Label>
/// {
///     [BindingProperty]
///     private void SetText(string value) { }
/// }
/// "#)?;
/// ```
pub fn parse_source(path: &str, source: &str) -> Result<SyntaxTree, ParseError> {
    parse(path, source)
}
