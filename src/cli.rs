use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::core::{Engine, ExpansionPolicy};
use crate::error::ExportError;

#[derive(Parser, Debug)]
#[command(name = "comment-export")]
#[command(about = "Export Go doc comments as JSON for syncing into generated bindings")]
#[command(version)]
pub struct Cli {
    /// Directory of Go sources to scan (subdirectories are ignored)
    #[arg(long = "go-folder", value_name = "PATH")]
    pub go_folder: Option<PathBuf>,

    /// JSON file to write, replaced on every run
    #[arg(long = "output-json-file", value_name = "PATH")]
    pub output_json_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name variants emitted per documented symbol: none, function3 or interface4
    #[arg(long, value_name = "POLICY")]
    pub expansion_policy: Option<ExpansionPolicy>,

    /// Keep trailing newlines in doc text
    #[arg(long)]
    pub no_trim: bool,

    /// Name of the top-level array field
    #[arg(long)]
    pub output_field_name: Option<String>,

    /// Sort by qualified name instead of discovery order
    #[arg(long)]
    pub sort_by_name: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration file values with command line flags applied on top
    pub fn resolve_config(&self) -> crate::error::Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())?;

        if let Some(go_folder) = &self.go_folder {
            config.paths.go_folder = Some(go_folder.clone());
        }
        if let Some(output) = &self.output_json_file {
            config.paths.output_json_file = Some(output.clone());
        }
        if let Some(policy) = self.expansion_policy {
            config.export.expansion_policy = policy;
        }
        if self.no_trim {
            config.export.trim_trailing_newlines = false;
        }
        if let Some(field_name) = &self.output_field_name {
            config.export.output_field_name = field_name.clone();
        }
        if self.sort_by_name {
            config.export.sort_by_name = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn execute(self) -> Result<()> {
        let config = self.resolve_config()?;

        let go_folder = config.paths.go_folder.clone().ok_or_else(|| {
            ExportError::Config("no source folder given (--go-folder)".to_string())
        })?;
        let output = config.paths.output_json_file.clone().ok_or_else(|| {
            ExportError::Config("no output file given (--output-json-file)".to_string())
        })?;

        let mut engine = Engine::new(&config.export)?;
        let summary = engine.export(&go_folder, &output)?;

        info!(
            "Exported {} records for {} symbols from {} files in {} packages",
            summary.records, summary.symbols, summary.files, summary.packages
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "comment-export",
            "--go-folder",
            "pkg",
            "--output-json-file",
            "out.json",
            "--expansion-policy",
            "function3",
            "--no-trim",
            "--output-field-name",
            "funComments",
            "--sort-by-name",
            "--config",
            "/nonexistent/for/this/test.toml",
        ])
        .unwrap();

        assert_eq!(cli.expansion_policy, Some(ExpansionPolicy::Function3));
        assert_eq!(cli.go_folder, Some(PathBuf::from("pkg")));
        // An explicit config path must exist
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_flags_applied_over_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.toml");
        std::fs::write(
            &path,
            "[paths]\ngo_folder = \"from-file\"\n\n[export]\nexpansion_policy = \"none\"\n",
        )
        .unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "comment-export",
            "--config",
            path_arg.as_str(),
            "--output-json-file",
            "out.json",
            "--no-trim",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.paths.go_folder, Some(PathBuf::from("from-file")));
        assert_eq!(config.paths.output_json_file, Some(PathBuf::from("out.json")));
        assert_eq!(config.export.expansion_policy, ExpansionPolicy::None);
        assert!(!config.export.trim_trailing_newlines);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = Cli::try_parse_from(["comment-export", "--expansion-policy", "everything"]);
        assert!(result.is_err());
    }
}
