//! Generator configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Settings threaded through every generation pass.
///
/// None of these affect what is generated, only where it is additionally
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Root directory of the project being compiled
    pub project_path: Option<PathBuf>,
    /// Also write generated units under `{project_path}/Temp/GeneratedCode`
    pub persist_generated_files: bool,
}

impl GeneratorConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Directory generated units for `assembly` are persisted to, if persistence is on.
    pub fn output_directory(&self, assembly: &str) -> Option<PathBuf> {
        if !self.persist_generated_files {
            return None;
        }
        self.project_path
            .as_ref()
            .map(|root| root.join("Temp").join("GeneratedCode").join(assembly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.output_directory("Game"), None);
    }

    #[test]
    fn test_output_directory() {
        let config = GeneratorConfig::from_json(
            r#"{ "projectPath": "/work/game", "persistGeneratedFiles": true }"#,
        )
        .unwrap();
        assert_eq!(
            config.output_directory("Game.Ui"),
            Some(PathBuf::from("/work/game/Temp/GeneratedCode/Game.Ui"))
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "persistGeneratedFiles": true }}"#).unwrap();
        let config = GeneratorConfig::from_file(file.path()).unwrap();
        assert!(config.persist_generated_files);
        assert_eq!(config.output_directory("Game"), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            GeneratorConfig::from_json("{ projectPath"),
            Err(ConfigError::Json(_))
        ));
    }
}
