//! Fully-qualified names of the runtime contract types.
//!
//! These strings are the whole interface between the generators and the
//! annotated source: markers and capabilities are recognised by exact
//! full-name comparison.

pub const SKIP_GENERATOR_ATTRIBUTE: &str = "global::ZBase.Foundation.Mvvm.SkipGeneratorForAssemblyAttribute";

pub const IOBSERVABLE_OBJECT: &str = "global::ZBase.Foundation.Mvvm.ComponentModel.IObservableObject";
pub const IBINDER: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.IBinder";
pub const IBINDING_CONTEXT: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.IBindingContext";

pub const BINDING_PROPERTY_ATTRIBUTE: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.BindingPropertyAttribute";
pub const BINDING_COMMAND_ATTRIBUTE: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.BindingCommandAttribute";

pub const BINDING_PROPERTY: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.BindingProperty";
pub const BINDING_COMMAND: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.BindingCommand";
pub const CONVERTER: &str = "global::ZBase.Foundation.Mvvm.ViewBinding.Converter";

pub const UNION_TYPE: &str = "global::ZBase.Foundation.Mvvm.Unions.Union";
/// Prefix of every constructed `IUnion<T>`
pub const IUNION_T: &str = "global::ZBase.Foundation.Mvvm.Unions.IUnion<";
pub const IUNION_CONVERTER_T: &str = "global::ZBase.Foundation.Mvvm.Unions.IUnionConverter";
pub const UNION_CONVERTER: &str = "global::ZBase.Foundation.Mvvm.Unions.UnionConverter";

/// Display-name prefix of the UI framework assembly
pub const UNITY_ASSEMBLY_PREFIX: &str = "UnityEngine,";

pub const SERIALIZE_FIELD: &str = "[global::UnityEngine.SerializeField]";
pub const HIDE_IN_INSPECTOR: &str = "[global::UnityEngine.HideInInspector]";

/// First lines of every generated unit
pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>\n#pragma warning disable\n#nullable disable\n";

pub const EXCLUDE_COVERAGE: &str = "[global::System.Diagnostics.CodeAnalysis.ExcludeFromCodeCoverage]";

/// Namespaces and simple names of the marker attributes, for syntactic matching.
pub mod markers {
    pub const COMPONENT_MODEL_NAMESPACE: &str = "ZBase.Foundation.Mvvm.ComponentModel";
    pub const INPUT_NAMESPACE: &str = "ZBase.Foundation.Mvvm.Input";
    pub const VIEW_BINDING_NAMESPACE: &str = "ZBase.Foundation.Mvvm.ViewBinding";

    pub const OBSERVABLE_PROPERTY: &str = "ObservableProperty";
    pub const RELAY_COMMAND: &str = "RelayCommand";
    pub const BINDING_PROPERTY: &str = "BindingProperty";
    pub const BINDING_COMMAND: &str = "BindingCommand";
}

/// `GeneratedCode` attribute line naming a generator.
pub fn generated_code(generator: &str) -> String {
    format!("[global::System.CodeDom.Compiler.GeneratedCode(\"{generator}\", \"1.0.0\")]")
}

pub const BINDER_GENERATOR: &str = "ZBase.Foundation.Mvvm.BinderGenerator";
pub const UNION_GENERATOR: &str = "ZBase.Foundation.Mvvm.InternalUnionGenerator";
