//! Diagnostic descriptors reported by the generators.

use mvgen_core::{DiagnosticDescriptor, Severity};

/// Internal fault inside the binder generator.
pub static BINDER_INTERNAL_ERROR: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "SG_INTERNAL_BINDER_01",
    title: "Binder Generator Error",
    message_format: "This error indicates a bug in the Binder source generators. Error message: '{0}'.",
    category: "BinderGenerator",
    severity: Severity::Error,
};

/// Internal fault inside the union generator.
pub static UNION_INTERNAL_ERROR: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "SG_INTERNAL_UNIONS_01",
    title: "Internal Union Generator Error",
    message_format: "This error indicates a bug in the Internal Union source generators. Error message: '{0}'.",
    category: "InternalUnionGenerator",
    severity: Severity::Error,
};

/// A `field:` attribute on a binding-property method whose class does not resolve.
pub static INVALID_FIELD_ATTRIBUTE_ON_BINDING_PROPERTY: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "MVGEN0001",
    title: "Invalid field targeted attribute on binding property method",
    message_format: "The method '{0}' annotated with [BindingProperty] has an attribute '{1}' targeting a field that could not be resolved to an attribute type",
    category: "BinderGenerator",
    severity: Severity::Error,
};

/// A `field:` attribute on a binding-command method whose class does not resolve.
pub static INVALID_FIELD_ATTRIBUTE_ON_BINDING_COMMAND: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "MVGEN0002",
    title: "Invalid field targeted attribute on binding command method",
    message_format: "The method '{0}' annotated with [BindingCommand] has an attribute '{1}' targeting a field that could not be resolved to an attribute type",
    category: "BinderGenerator",
    severity: Severity::Error,
};
