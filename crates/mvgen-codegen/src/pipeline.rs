//! Running every generator over one compilation.

use tracing::debug;

use mvgen_core::{GeneratorConfig, SemanticModel};

use crate::binder::BinderGenerator;
use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::generator::{GeneratorOutput, SourceGenerator};
use crate::union::InternalUnionGenerator;

/// Run the binder generator and the union generator.
///
/// Binder units come first, then union units.
pub fn generate(
    model: &dyn SemanticModel,
    config: &GeneratorConfig,
    cancel: &CancellationToken,
) -> Result<GeneratorOutput> {
    let binders = BinderGenerator::new();
    let unions = InternalUnionGenerator::new();
    let (binder_output, union_output) = rayon::join(
        || run(&binders, model, config, cancel),
        || run(&unions, model, config, cancel),
    );

    let mut output = binder_output?;
    output.extend(union_output?);
    Ok(output)
}

fn run(
    generator: &dyn SourceGenerator,
    model: &dyn SemanticModel,
    config: &GeneratorConfig,
    cancel: &CancellationToken,
) -> Result<GeneratorOutput> {
    let output = generator.generate(model, config, cancel)?;
    debug!(
        generator = generator.name(),
        sources = output.sources.len(),
        diagnostics = output.diagnostics.len(),
        "generator finished"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvgen_resolver::{standard_references, unity_engine, Compilation};

    use crate::error::GeneratorError;

    const VIEW_MODEL: &str = r#"
        using UnityEngine;
        using ZBase.Foundation.Mvvm.ComponentModel;
        using ZBase.Foundation.Mvvm.Input;

        namespace Game
        {
            public partial class PlayerViewModel : IObservableObject
            {
                [ObservableProperty] private string _name;
                [ObservableProperty] private Color _tint;
                [ObservableProperty] private Vector2 _position;

                [RelayCommand] private void Move(Vector2 delta) { }
            }
        }
    "#;

    const BINDERS: &str = r#"
        using UnityEngine;
        using UnityEngine.UI;
        using ZBase.Foundation.Mvvm.ViewBinding;

        namespace Game.Binders
        {
            public partial class TextBinder : MonoBinder<Text>
            {
                [BindingProperty]
                [field: Label("Text")]
                [field: HideInInspector]
                private void SetText(string value) { }

                [BindingProperty]
                private void SetColor(in Color color) { }
            }

            public partial class ButtonBinder : MonoBinder<Button>
            {
                [BindingCommand]
                partial void OnClick();

                [BindingCommand]
                [field: NotAnAttribute]
                partial void OnHold(float seconds);
            }
        }
    "#;

    fn compile(assembly_attribute: &str) -> Compilation {
        let header = format!("using ZBase.Foundation.Mvvm;\n{assembly_attribute}\n");
        Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source("AssemblyInfo.cs", header)
            .source("PlayerViewModel.cs", VIEW_MODEL)
            .source("Binders.cs", BINDERS)
            .build()
            .unwrap()
    }

    fn run(compilation: &Compilation, config: &GeneratorConfig) -> GeneratorOutput {
        generate(compilation, config, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_binder_units_then_union_units() {
        let output = run(&compile(""), &GeneratorConfig::default());
        let names: Vec<&str> = output.sources.iter().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Game.Binders.TextBinder__BinderGenerator.g.cs",
                "Game.Binders.ButtonBinder__BinderGenerator.g.cs",
                "UnityEngine.Color__Union.g.cs",
                "UnityEngine.Vector2__Union.g.cs",
                "Game__UnionRegistry.g.cs",
            ]
        );

        let codes: Vec<&str> = output.diagnostics.iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["MVGEN0002"]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let config = GeneratorConfig::default();
        let first = run(&compile(""), &config);
        let second = run(&compile(""), &config);
        assert_eq!(first, second);

        let compilation = compile("");
        assert_eq!(run(&compilation, &config), run(&compilation, &config));
    }

    #[test]
    fn test_disabled_assembly_produces_nothing() {
        let output = run(&compile("[assembly: SkipGeneratorForAssembly]"), &GeneratorConfig::default());
        assert!(output.is_empty());
    }

    #[test]
    fn test_persists_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            project_path: Some(dir.path().to_path_buf()),
            persist_generated_files: true,
        };
        let output = run(&compile(""), &config);

        let root = dir.path().join("Temp").join("GeneratedCode").join("Game");
        for source in &output.sources {
            let written = std::fs::read_to_string(root.join(&source.hint_name)).unwrap();
            assert_eq!(written, source.text);
        }
    }

    #[test]
    fn test_other_sources_do_not_block_binders() {
        let compilation = Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source("Binders.cs", BINDERS)
            .source(
                "Buffer.cs",
                "namespace Game { public class Buffer { int[] _items; public ref int Slot(int i) => ref _items[i]; } }",
            )
            .source("Broken.cs", "namespace Game { public class Broken {")
            .build()
            .unwrap();
        assert_eq!(compilation.parse_errors().len(), 1);

        let output = run(&compilation, &GeneratorConfig::default());
        let names: Vec<&str> = output.sources.iter().map(|s| s.hint_name.as_str()).collect();
        assert!(names.contains(&"Game.Binders.TextBinder__BinderGenerator.g.cs"));
        assert!(names.contains(&"Game.Binders.ButtonBinder__BinderGenerator.g.cs"));
    }

    #[test]
    fn test_cancellation_discards_the_pass() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = generate(&compile(""), &GeneratorConfig::default(), &cancel);
        assert!(matches!(result, Err(GeneratorError::Cancelled)));
    }
}
