//! The generator interface and the pass boundary.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use mvgen_core::{Diagnostic, DiagnosticDescriptor, GeneratorConfig, SemanticModel};

use crate::cancel::CancellationToken;
use crate::error::{GeneratorError, Result};

/// Common trait for source generators.
pub trait SourceGenerator: Sync {
    /// Generator name, as written in `GeneratedCode` attributes.
    fn name(&self) -> &'static str;

    /// Run one generation pass over a compilation snapshot.
    ///
    /// Returns `Err(Cancelled)` when `cancel` fires mid-pass; every other
    /// failure is reported as a diagnostic in the output.
    fn generate(
        &self,
        model: &dyn SemanticModel,
        config: &GeneratorConfig,
        cancel: &CancellationToken,
    ) -> Result<GeneratorOutput>;
}

/// One generated source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Unique file name of the unit, ending in `.g.cs`
    pub hint_name: String,
    pub text: String,
}

/// Everything a pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorOutput {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratorOutput {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Append another output after this one.
    pub fn extend(&mut self, other: GeneratorOutput) {
        self.sources.extend(other.sources);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Run `f`, turning a panic into [`GeneratorError::Panicked`].
pub(crate) fn guard<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(GeneratorError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The whole-pass diagnostic for an unexpected failure.
pub(crate) fn internal_error(descriptor: &'static DiagnosticDescriptor, error: &GeneratorError) -> Diagnostic {
    Diagnostic::create(descriptor, None, &[&error.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::UNION_INTERNAL_ERROR;

    #[test]
    fn test_guard_passes_results_through() {
        assert_eq!(guard(|| Ok(3)).unwrap(), 3);
        assert!(matches!(guard::<()>(|| Err(GeneratorError::Cancelled)), Err(GeneratorError::Cancelled)));
    }

    #[test]
    fn test_guard_catches_panics() {
        let result = guard::<()>(|| panic!("unexpected symbol shape"));
        match result {
            Err(GeneratorError::Panicked(message)) => assert_eq!(message, "unexpected symbol shape"),
            other => panic!("expected a caught panic, got {other:?}"),
        }

        let formatted = guard::<()>(|| panic!("bad index {}", 7));
        assert!(matches!(formatted, Err(GeneratorError::Panicked(m)) if m == "bad index 7"));
    }

    #[test]
    fn test_internal_error_diagnostic() {
        let diagnostic = internal_error(&UNION_INTERNAL_ERROR, &GeneratorError::MissingSymbol("Game.Vm".into()));
        assert_eq!(diagnostic.code(), "SG_INTERNAL_UNIONS_01");
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.location, None);
        assert_eq!(
            diagnostic.message,
            "This error indicates a bug in the Internal Union source generators. Error message: 'No symbol declared for 'Game.Vm''."
        );
    }
}
