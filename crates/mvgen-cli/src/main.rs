//! `mvgen`: run the binder and union generators over C# sources.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use mvgen_codegen::{generate, write_sources, CancellationToken, GeneratorOutput};
use mvgen_core::GeneratorConfig;
use mvgen_resolver::{standard_references, unity_engine, Compilation};

#[derive(Debug, Parser)]
#[command(name = "mvgen", version, about = "Generate MVVM binder and union sources")]
struct Cli {
    /// Name of the assembly being compiled.
    #[arg(long, default_value = "Assembly-CSharp")]
    assembly: String,

    /// Reference the UI framework assembly.
    #[arg(long)]
    unity: bool,

    /// JSON generator configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to write generated units to.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also persist generated units under the project's Temp directory.
    #[arg(long)]
    persist: bool,

    /// Source files or directories.
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            for diagnostic in &output.diagnostics {
                eprintln!("{diagnostic}");
            }
            if output.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MVGEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("failed to install tracing subscriber: {error}");
    }
}

fn run(cli: &Cli) -> Result<GeneratorOutput> {
    let config = load_config(cli)?;
    let sources = collect_sources(&cli.inputs)?;
    info!(files = sources.len(), assembly = %cli.assembly, "compiling");

    let mut builder = Compilation::builder(cli.assembly.as_str()).references(standard_references());
    if cli.unity {
        builder = builder.reference(unity_engine());
    }
    for path in &sources {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        builder = builder.source(path.display().to_string(), text);
    }
    let compilation = builder.build()?;
    for error in compilation.parse_errors() {
        eprintln!("warning: {error}");
    }

    let output = generate(&compilation, &config, &CancellationToken::new())?;

    if let Some(out) = &cli.out {
        let written = write_sources(out, &output.sources)?;
        info!(count = written.len(), directory = %out.display(), "wrote generated sources");
    }
    Ok(output)
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if cli.persist {
        config.persist_generated_files = true;
        if config.project_path.is_none() {
            config.project_path = Some(std::env::current_dir().context("failed to read the working directory")?);
        }
    }
    debug!(?config, "generator configuration");
    Ok(config)
}

/// Every `.cs` file named by `inputs`, directories walked recursively, sorted.
fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_file() {
            sources.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            anyhow::bail!("input not found: {}", input.display());
        }
        for entry in WalkDir::new(input) {
            let entry = entry.with_context(|| format!("failed to walk {}", input.display()))?;
            if entry.file_type().is_file() && is_source(entry.path()) {
                sources.push(entry.into_path());
            }
        }
    }
    sources.sort();
    sources.dedup();
    Ok(sources)
}

fn is_source(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("cs")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINDER: &str = r#"
        using ZBase.Foundation.Mvvm.ViewBinding;
        namespace Game
        {
            public partial class LogBinder : IBinder
            {
                [BindingProperty]
                private void SetCount(int count) { }
            }
        }
    "#;

    fn cli(inputs: Vec<PathBuf>, out: Option<PathBuf>) -> Cli {
        Cli { assembly: "Game".to_string(), unity: false, config: None, out, persist: false, inputs }
    }

    #[test]
    fn test_collects_sorted_cs_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/B.cs"), "").unwrap();
        fs::write(dir.path().join("A.cs"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let sources = collect_sources(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(sources, vec![dir.path().join("A.cs"), dir.path().join("nested/B.cs")]);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(collect_sources(&[PathBuf::from("/does/not/exist")]).is_err());
    }

    #[test]
    fn test_writes_generated_units() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("LogBinder.cs");
        fs::write(&input, BINDER).unwrap();
        let out = dir.path().join("out");

        let output = run(&cli(vec![input], Some(out.clone()))).unwrap();
        assert!(!output.has_errors());
        assert_eq!(output.sources.len(), 1);
        assert!(out.join("Game.LogBinder__BinderGenerator.g.cs").is_file());
    }

    #[test]
    fn test_unparsable_file_does_not_stop_generation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LogBinder.cs"), BINDER).unwrap();
        fs::write(dir.path().join("Broken.cs"), "class Broken {").unwrap();

        let output = run(&cli(vec![dir.path().to_path_buf()], None)).unwrap();
        assert_eq!(output.sources.len(), 1);
        assert_eq!(output.sources[0].hint_name, "Game.LogBinder__BinderGenerator.g.cs");
    }

    #[test]
    fn test_parses_arguments() {
        let cli = Cli::try_parse_from(["mvgen", "--unity", "--assembly", "Ui", "--out", "gen", "Assets"]).unwrap();
        assert!(cli.unity);
        assert_eq!(cli.assembly, "Ui");
        assert_eq!(cli.out, Some(PathBuf::from("gen")));
        assert_eq!(cli.inputs, vec![PathBuf::from("Assets")]);
        assert!(Cli::try_parse_from(["mvgen"]).is_err());
    }
}
