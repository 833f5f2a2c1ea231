//! Hint names and on-disk persistence of generated units.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use mvgen_core::GeneratorConfig;

use crate::error::{GeneratorError, Result};
use crate::generator::GeneratedSource;

/// File name of a unit generated for the type `full_name`.
///
/// `global::` qualifiers are dropped and generic punctuation becomes `_`:
/// `global::Game.Slot<int>` with suffix `__Union` is `Game.Slot_int___Union.g.cs`.
pub fn hint_name(full_name: &str, suffix: &str) -> String {
    let stripped = full_name.replace("global::", "");
    let mut name: String = stripped
        .chars()
        .map(|c| match c {
            '<' | '>' | ',' | ' ' | '[' | ']' | '?' | '*' | ':' => '_',
            c => c,
        })
        .collect();
    name.push_str(suffix);
    name.push_str(".g.cs");
    name
}

/// A C# identifier derived from a type's full name.
pub fn identifier(full_name: &str) -> String {
    full_name
        .replace("global::", "")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Write every unit into `directory`, creating it first.
pub fn write_sources(directory: &Path, sources: &[GeneratedSource]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory).map_err(|source| GeneratorError::Write {
        path: directory.to_path_buf(),
        source,
    })?;

    sources
        .iter()
        .map(|unit| {
            let path = directory.join(&unit.hint_name);
            fs::write(&path, &unit.text).map_err(|source| GeneratorError::Write {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        })
        .collect()
}

/// Also write the units under the project's generated-code directory, if configured.
///
/// Failures are logged and otherwise ignored.
pub fn persist(config: &GeneratorConfig, assembly: &str, sources: &[GeneratedSource]) {
    if sources.is_empty() {
        return;
    }
    let Some(directory) = config.output_directory(assembly) else {
        return;
    };

    match write_sources(&directory, sources) {
        Ok(paths) => debug!(count = paths.len(), directory = %directory.display(), "persisted generated sources"),
        Err(error) => warn!(%error, "failed to persist generated sources"),
    }
}
