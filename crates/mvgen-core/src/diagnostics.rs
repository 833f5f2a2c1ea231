//! Diagnostics reported by the generators.

use std::fmt;

use crate::ast::Location;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hidden,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hidden => write!(f, "hidden"),
        }
    }
}

/// Static description of a diagnostic kind.
///
/// `message_format` uses positional placeholders `{0}`, `{1}`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub message_format: &'static str,
    pub category: &'static str,
    pub severity: Severity,
}

impl DiagnosticDescriptor {
    /// Substitute `args` into the message format.
    pub fn format_message(&self, args: &[&str]) -> String {
        let mut message = self.message_format.to_string();
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}

/// One reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub descriptor: &'static DiagnosticDescriptor,
    pub location: Option<Location>,
    pub message: String,
}

impl Diagnostic {
    pub fn create(
        descriptor: &'static DiagnosticDescriptor,
        location: Option<Location>,
        args: &[&str],
    ) -> Self {
        Self {
            descriptor,
            location,
            message: descriptor.format_message(args),
        }
    }

    pub fn code(&self) -> &'static str {
        self.descriptor.id
    }

    pub fn severity(&self) -> Severity {
        self.descriptor.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}[{}]: {}", self.severity(), self.code(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    static SAMPLE: DiagnosticDescriptor = DiagnosticDescriptor {
        id: "TEST0001",
        title: "Sample",
        message_format: "Attribute '{0}' on '{1}' is invalid",
        category: "Tests",
        severity: Severity::Warning,
    };

    #[test]
    fn test_message_formatting() {
        let diagnostic = Diagnostic::create(&SAMPLE, None, &["Label", "SetText"]);
        assert_eq!(diagnostic.message, "Attribute 'Label' on 'SetText' is invalid");
        assert_eq!(diagnostic.to_string(), "warning[TEST0001]: Attribute 'Label' on 'SetText' is invalid");
    }

    #[test]
    fn test_display_with_location() {
        let location = Location {
            path: "Binder.cs".into(),
            span: Span { start: 0, end: 4, line: 3, column: 9 },
        };
        let diagnostic = Diagnostic::create(&SAMPLE, Some(location), &["A", "B"]);
        assert!(diagnostic.to_string().starts_with("Binder.cs:3:9: warning[TEST0001]"));
        assert!(!diagnostic.is_error());
    }
}
