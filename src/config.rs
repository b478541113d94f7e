use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ExpansionPolicy;
use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,

    /// Extraction and output format settings
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the Go sources (not searched recursively)
    pub go_folder: Option<PathBuf>,

    /// Destination JSON file, replaced on every run
    pub output_json_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name variants emitted per documented symbol
    pub expansion_policy: ExpansionPolicy,

    /// Strip trailing line breaks from doc text
    pub trim_trailing_newlines: bool,

    /// Name of the top-level array field
    pub output_field_name: String,

    /// Sort symbols by qualified name instead of discovery order
    pub sort_by_name: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            expansion_policy: ExpansionPolicy::default(),
            trim_trailing_newlines: true,
            output_field_name: "funcs".to_string(),
            sort_by_name: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load the given file, or the first config file found in the working
    /// directory, or fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let candidates = [
                    "CommentExport.toml",
                    "comment-export.toml",
                    ".comment-export.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.output_field_name.trim().is_empty() {
            return Err(ExportError::Config(
                "output_field_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
