//! Internal union generator: synthesizes a union wrapper for every type
//! that flows through an observable property or a binding endpoint.

mod declaration;
mod emit;

pub use declaration::{InternalUnionDeclaration, UnionType};
pub use emit::UNIONS_NAMESPACE;

use rayon::prelude::*;
use tracing::{debug, warn};

use mvgen_core::{GeneratorConfig, SemanticModel, TypeId};

use crate::cancel::CancellationToken;
use crate::constants::UNION_GENERATOR;
use crate::diagnostics::UNION_INTERNAL_ERROR;
use crate::error::{GeneratorError, Result};
use crate::generator::{guard, internal_error, GeneratedSource, GeneratorOutput, SourceGenerator};
use crate::model::TypeRef;
use crate::output::persist;
use crate::scanner::{scan_union_candidates, Candidate, CandidateKind};
use crate::semantic::{is_valid_compilation, resolve_ignored_type, resolve_type_ref};

#[derive(Debug, Clone, Copy, Default)]
pub struct InternalUnionGenerator;

impl InternalUnionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Candidate type refs and hand-wrapped types, in scan order.
    fn resolve_candidates(
        &self,
        model: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> Result<(Vec<TypeRef>, Vec<TypeId>)> {
        let candidates = scan_union_candidates(model.syntax_trees());
        let (structs, members): (Vec<Candidate<'_>>, Vec<Candidate<'_>>) =
            candidates.into_iter().partition(|c| c.kind == CandidateKind::Struct);

        let (type_refs, ignored) = rayon::join(
            || {
                members
                    .par_iter()
                    .map(|candidate| {
                        cancel.check()?;
                        Ok(resolve_type_ref(model, candidate))
                    })
                    .collect::<Result<Vec<_>>>()
            },
            || {
                structs
                    .par_iter()
                    .map(|candidate| {
                        cancel.check()?;
                        Ok(resolve_ignored_type(model, candidate))
                    })
                    .collect::<Result<Vec<_>>>()
            },
        );

        let type_refs: Vec<TypeRef> = type_refs?.into_iter().flatten().collect();
        let ignored: Vec<TypeId> = ignored?.into_iter().flatten().collect();

        debug!(
            members = members.len(),
            structs = structs.len(),
            type_refs = type_refs.len(),
            ignored = ignored.len(),
            "union candidates resolved"
        );
        Ok((type_refs, ignored))
    }
}

impl SourceGenerator for InternalUnionGenerator {
    fn name(&self) -> &'static str {
        UNION_GENERATOR
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

        let (type_refs, ignored) = self.resolve_candidates(model, cancel)?;
        if type_refs.is_empty() {
            return Ok(GeneratorOutput::default());
        }
        cancel.check()?;

        let mut output = GeneratorOutput::default();
        let declaration = match guard(|| Ok(InternalUnionDeclaration::new(model, &type_refs, &ignored))) {
            Ok(declaration) => declaration,
            Err(error) => {
                report(&mut output, error)?;
                return Ok(output);
            }
        };

        let value_unions = guard(|| Ok(declaration.generate_unions_for_value_types()));
        let ref_unions = guard(|| Ok(declaration.generate_unions_for_ref_types()));
        let registry = guard(|| Ok(declaration.generate_static_class().into_iter().collect::<Vec<GeneratedSource>>()));

        for emitted in [value_unions, ref_unions, registry] {
            match emitted {
                Ok(sources) => output.sources.extend(sources),
                Err(error) => report(&mut output, error)?,
            }
        }

        debug!(
            value_types = declaration.value_types.len(),
            ref_types = declaration.ref_types.len(),
            "unions generated"
        );
        persist(config, model.assembly_name(), &output.sources);
        Ok(output)
    }
}

fn report(output: &mut GeneratorOutput, error: GeneratorError) -> Result<()> {
    if let GeneratorError::Cancelled = error {
        return Err(error);
    }
    warn!(%error, "union generation failed");
    output.diagnostics.push(internal_error(&UNION_INTERNAL_ERROR, &error));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvgen_resolver::{standard_references, unity_engine, Compilation};

    fn compile(source: &str, unity: bool) -> Compilation {
        let mut builder = Compilation::builder("Game").references(standard_references());
        if unity {
            builder = builder.reference(unity_engine());
        }
        builder.source("Test.cs", source).build().unwrap()
    }

    fn run(compilation: &Compilation) -> GeneratorOutput {
        InternalUnionGenerator::new()
            .generate(compilation, &GeneratorConfig::default(), &CancellationToken::new())
            .unwrap()
    }

    const SOURCE: &str = r#"
        using UnityEngine;
        using ZBase.Foundation.Mvvm.ViewBinding;
        namespace Game
        {
            public partial class ImageBinder : MonoBinder<UnityEngine.UI.Image>
            {
                [BindingProperty] private void SetColor(Color color) { }
                [BindingProperty] private void SetSprite(Sprite sprite) { }
                [BindingProperty] private void SetAlpha(float alpha) { }
            }
        }
    "#;

    #[test]
    fn test_units_in_order() {
        let output = run(&compile(SOURCE, true));
        let names: Vec<&str> = output.sources.iter().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "UnityEngine.Color__Union.g.cs",
                "UnityEngine.Sprite__Union.g.cs",
                "Game__UnionRegistry.g.cs",
            ]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_value_union_layout() {
        let output = run(&compile(SOURCE, true));
        let text = &output.sources[0].text;

        assert!(text.starts_with("// <auto-generated/>\n"));
        assert!(text.contains("namespace ZBase.Foundation.Mvvm.Unions.__Internal\n{\n"));
        assert!(text.contains("[global::System.CodeDom.Compiler.GeneratedCode(\"ZBase.Foundation.Mvvm.InternalUnionGenerator\", \"1.0.0\")]"));
        assert!(text.contains("LayoutKind.Explicit)]\n    internal readonly struct Union__UnityEngine_Color : global::ZBase.Foundation.Mvvm.Unions.IUnion<global::UnityEngine.Color>\n"));
        assert!(text.contains("public readonly global::UnityEngine.Color Value;"));
        assert!(text.contains("public sealed class Converter : global::ZBase.Foundation.Mvvm.Unions.IUnionConverter<global::UnityEngine.Color>"));
        assert!(text.contains("=> new Union__UnityEngine_Color(value).Union;"));
    }

    #[test]
    fn test_ref_union_is_a_wrapper() {
        let output = run(&compile(SOURCE, true));
        let text = &output.sources[1].text;

        assert!(!text.contains("StructLayout"));
        assert!(text.contains("internal readonly struct Union__UnityEngine_Sprite"));
        assert!(text.contains("public global::UnityEngine.Sprite Value => this.Union.Object as global::UnityEngine.Sprite;"));
        assert!(text.contains("return union.Object is T;"));
    }

    #[test]
    fn test_registry_registers_every_union() {
        let output = run(&compile(SOURCE, true));
        let text = &output.sources[2].text;

        assert!(text.contains("internal static partial class UnionRegistry__Game"));
        assert!(text.contains("RuntimeInitializeOnLoadMethod"));
        let color = text
            .find("TryRegister<global::UnityEngine.Color>(Union__UnityEngine_Color.Converter.Default);")
            .unwrap();
        let sprite = text
            .find("TryRegister<global::UnityEngine.Sprite>(Union__UnityEngine_Sprite.Converter.Default);")
            .unwrap();
        assert!(color < sprite);
        assert!(text.contains("private sealed class PreserveAttribute : global::System.Attribute { }"));
    }

    #[test]
    fn test_registry_without_ui_framework() {
        let source = r#"
            using ZBase.Foundation.Mvvm.ComponentModel;
            namespace Game
            {
                public struct Stats { }
                public partial class Vm : IObservableObject
                {
                    [ObservableProperty] private Stats _stats;
                }
            }
        "#;
        let output = run(&compile(source, false));
        assert_eq!(output.sources.len(), 2);
        let registry = &output.sources[1].text;
        assert!(registry.contains("[global::System.Runtime.CompilerServices.ModuleInitializer]"));
        assert!(!registry.contains("UnityEngine"));
    }

    #[test]
    fn test_no_candidates_no_output() {
        let output = run(&compile("namespace Game { public class Empty { } }", true));
        assert!(output.is_empty());
    }

    #[test]
    fn test_only_native_types_no_output() {
        let source = r#"
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public partial class B : MonoBinder<UnityEngine.UI.Text>
                {
                    [BindingProperty] private void SetText(string value) { }
                }
            }
        "#;
        assert!(run(&compile(source, true)).is_empty());
    }

    #[test]
    fn test_disabled_assembly() {
        let source = r#"
            using UnityEngine;
            using ZBase.Foundation.Mvvm.ViewBinding;
            [assembly: ZBase.Foundation.Mvvm.SkipGeneratorForAssembly]
            namespace Game
            {
                public partial class B : MonoBinder<UnityEngine.UI.Image>
                {
                    [BindingProperty] private void SetColor(Color color) { }
                }
            }
        "#;
        assert!(run(&compile(source, true)).is_empty());
    }

    #[test]
    fn test_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = InternalUnionGenerator::new().generate(&compile(SOURCE, true), &GeneratorConfig::default(), &cancel);
        assert!(matches!(result, Err(GeneratorError::Cancelled)));
    }
}
