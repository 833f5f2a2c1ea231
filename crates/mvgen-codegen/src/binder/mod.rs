//! Binder generator: completes binder classes with binding fields,
//! union adapters, command bodies and `BindMembers`.

mod declaration;
mod emit;

pub use declaration::{references_ui_framework, BinderDeclaration};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use mvgen_core::names::to_property_name;
use mvgen_core::{GeneratorConfig, SemanticModel, TypeDecl};

use crate::cancel::CancellationToken;
use crate::constants::BINDER_GENERATOR;
use crate::diagnostics::BINDER_INTERNAL_ERROR;
use crate::error::{GeneratorError, Result};
use crate::generator::{guard, internal_error, GeneratorOutput, SourceGenerator};
use crate::output::persist;
use crate::scanner::scan_binder_candidates;
use crate::semantic::{is_binder_class, is_valid_compilation};

/// Backing field of a binding property endpoint.
pub fn binding_field_name(method: &str) -> String {
    format!("_bindingFieldFor{}", to_property_name(method))
}

/// Converter field of a binding property endpoint.
pub fn converter_field_name(method: &str) -> String {
    format!("_converterFor{}", to_property_name(method))
}

/// Backing field of a binding command endpoint.
pub fn binding_command_field_name(method: &str) -> String {
    format!("_bindingCommandFor{}", to_property_name(method))
}

/// Method receiving the bound union for a property endpoint.
pub fn adapter_method_name(method: &str) -> String {
    format!("{method}__Union")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BinderGenerator;

impl BinderGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Binder classes of the compilation, one declaration per class.
    fn matched_binders<'m>(
        &self,
        model: &'m dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'m TypeDecl>> {
        let candidates = scan_binder_candidates(model.syntax_trees());

        let matched = candidates
            .par_iter()
            .map(|decl| {
                cancel.check()?;
                Ok(is_binder_class(model, decl).then_some(*decl))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut seen = FxHashSet::default();
        let binders: Vec<&TypeDecl> = matched
            .into_iter()
            .flatten()
            .filter(|decl| seen.insert(decl.metadata_name()))
            .collect();

        debug!(candidates = candidates.len(), binders = binders.len(), "binder candidates resolved");
        Ok(binders)
    }
}

impl SourceGenerator for BinderGenerator {
    fn name(&self) -> &'static str {
        BINDER_GENERATOR
    }

    fn generate(
        &self,
        model: &dyn SemanticModel,
        config: &GeneratorConfig,
        cancel: &CancellationToken,
    ) -> Result<GeneratorOutput> {
        if !is_valid_compilation(model) {
            debug!(assembly = model.assembly_name(), "generation disabled for assembly");
            return Ok(GeneratorOutput::default());
        }

        let binders = self.matched_binders(model, cancel)?;

        let units: Vec<_> = binders
            .par_iter()
            .map(|decl| {
                cancel.check()?;
                guard(|| {
                    let declaration = BinderDeclaration::build(model, decl)?;
                    let source = declaration.generate_source();
                    Ok((source, declaration.diagnostics))
                })
            })
            .collect();

        let mut output = GeneratorOutput::default();
        for (decl, unit) in binders.iter().zip(units) {
            match unit {
                Ok((source, diagnostics)) => {
                    output.sources.push(source);
                    output.diagnostics.extend(diagnostics);
                }
                Err(GeneratorError::Cancelled) => return Err(GeneratorError::Cancelled),
                Err(error) => {
                    warn!(binder = %decl.name, %error, "binder generation failed");
                    output.diagnostics.push(internal_error(&BINDER_INTERNAL_ERROR, &error));
                }
            }
        }

        persist(config, model.assembly_name(), &output.sources);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvgen_resolver::{standard_references, unity_engine, Compilation};

    fn compile(source: &str) -> Compilation {
        Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source("Binders.cs", source)
            .build()
            .unwrap()
    }

    fn run(compilation: &Compilation) -> GeneratorOutput {
        BinderGenerator::new()
            .generate(compilation, &GeneratorConfig::default(), &CancellationToken::new())
            .unwrap()
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(binding_field_name("SetText"), "_bindingFieldForSetText");
        assert_eq!(converter_field_name("_setText"), "_converterForSetText");
        assert_eq!(binding_command_field_name("m_onClick"), "_bindingCommandForOnClick");
        assert_eq!(adapter_method_name("SetText"), "SetText__Union");
    }

    #[test]
    fn test_one_unit_per_binder_class() {
        let compilation = Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source(
                "TextBinder.cs",
                r#"
                using ZBase.Foundation.Mvvm.ViewBinding;
                namespace Game
                {
                    public partial class TextBinder : MonoBinder<UnityEngine.UI.Text>
                    {
                        [BindingProperty] private void SetText(string value) { }
                    }
                }
                "#,
            )
            .source(
                "TextBinder.Color.cs",
                r#"
                using ZBase.Foundation.Mvvm.ViewBinding;
                namespace Game
                {
                    public partial class TextBinder : MonoBinder<UnityEngine.UI.Text>
                    {
                        [BindingProperty] private void SetColor(UnityEngine.Color color) { }
                    }

                    public partial class ButtonBinder : MonoBinder<UnityEngine.UI.Button>
                    {
                        [BindingCommand] partial void OnClick();
                    }

                    public partial class Plain : UnityEngine.MonoBehaviour
                    {
                        [BindingProperty] private void SetText(string value) { }
                    }
                }
                "#,
            )
            .build()
            .unwrap();

        let output = run(&compilation);
        let names: Vec<&str> = output.sources.iter().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Game.TextBinder__BinderGenerator.g.cs", "Game.ButtonBinder__BinderGenerator.g.cs"]
        );
        assert!(output.sources[0].text.contains("SetText__Union"));
        assert!(output.sources[0].text.contains("SetColor__Union"));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_disabled_assembly_generates_nothing() {
        let compilation = compile(
            r#"
            using ZBase.Foundation.Mvvm.ViewBinding;
            [assembly: ZBase.Foundation.Mvvm.SkipGeneratorForAssembly]
            namespace Game
            {
                public partial class TextBinder : MonoBinder<UnityEngine.UI.Text>
                {
                    [BindingProperty] [field: Nope] private void SetText(string value) { }
                }
            }
            "#,
        );
        assert!(run(&compilation).is_empty());
    }

    #[test]
    fn test_forwarding_diagnostics_are_reported() {
        let compilation = compile(
            r#"
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public partial class ButtonBinder : MonoBinder<UnityEngine.UI.Button>
                {
                    [BindingCommand]
                    [field: Nope]
                    partial void OnClick();
                }
            }
            "#,
        );
        let output = run(&compilation);
        assert_eq!(output.sources.len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code(), "MVGEN0002");
        assert!(output.has_errors());
    }

    #[test]
    fn test_cancelled_pass_returns_error() {
        let compilation = compile(
            r#"
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public partial class TextBinder : MonoBinder<UnityEngine.UI.Text>
                {
                    [BindingProperty] private void SetText(string value) { }
                }
            }
            "#,
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = BinderGenerator::new().generate(&compilation, &GeneratorConfig::default(), &cancel);
        assert!(matches!(result, Err(GeneratorError::Cancelled)));
    }
}
