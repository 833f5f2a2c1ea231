//! Generator benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mvgen_codegen::{generate, CancellationToken};
use mvgen_core::GeneratorConfig;
use mvgen_resolver::{standard_references, unity_engine, Compilation};

const BINDER: &str = r#"
using UnityEngine;
using UnityEngine.UI;
using ZBase.Foundation.Mvvm.ViewBinding;

namespace Game.Binders
{
    public partial class TextBinder : MonoBinder<Text>
    {
        [BindingProperty]
        [field: Label("Text")]
        private void SetText(string value) { }

        [BindingProperty]
        private void SetColor(in Color color) { }

        [BindingProperty]
        private void SetOffset(Vector2 offset) { }

        [BindingCommand]
        partial void OnClick();
    }
}
"#;

const VIEW_MODEL: &str = r#"
using UnityEngine;
using ZBase.Foundation.Mvvm.ComponentModel;

namespace Game
{
    public partial class PlayerViewModel : IObservableObject
    {
        [ObservableProperty] private string _name;
        [ObservableProperty] private Color _tint;
        [ObservableProperty] private Vector3 _position;
        [ObservableProperty] private Sprite _icon;
    }
}
"#;

fn compilation(copies: usize) -> Compilation {
    let mut builder = Compilation::builder("Game")
        .references(standard_references())
        .reference(unity_engine());
    for index in 0..copies {
        let suffix = format!("{index}");
        builder = builder
            .source(format!("Binder{index}.cs"), BINDER.replace("TextBinder", &format!("TextBinder{suffix}")))
            .source(
                format!("ViewModel{index}.cs"),
                VIEW_MODEL.replace("PlayerViewModel", &format!("PlayerViewModel{suffix}")),
            );
    }
    builder.build().unwrap()
}

fn generate_small(c: &mut Criterion) {
    let compilation = compilation(1);
    let config = GeneratorConfig::default();
    c.bench_function("generate_small", |b| {
        b.iter(|| generate(black_box(&compilation), &config, &CancellationToken::new()))
    });
}

fn generate_large(c: &mut Criterion) {
    let compilation = compilation(64);
    let config = GeneratorConfig::default();
    c.bench_function("generate_large", |b| {
        b.iter(|| generate(black_box(&compilation), &config, &CancellationToken::new()))
    });
}

fn build_compilation(c: &mut Criterion) {
    c.bench_function("build_compilation", |b| b.iter(|| compilation(black_box(8))));
}

criterion_group!(benches, generate_small, generate_large, build_compilation);
criterion_main!(benches);
