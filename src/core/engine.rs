use std::path::Path;

use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::Result;
use super::{
    DocExtractor, ExtractOptions, GoParser, JsonWriter, NameExpander, OutputDocument,
    SourceScanner,
};

/// Counts reported after a successful export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub packages: usize,
    pub files: usize,
    pub symbols: usize,
    pub records: usize,
}

/// Runs scan, extraction, expansion and writing in one pass
pub struct Engine {
    config: ExportConfig,
    scanner: SourceScanner,
    writer: JsonWriter,
}

impl Engine {
    pub fn new(config: &ExportConfig) -> Result<Self> {
        debug!("Export settings: {:?}", config);

        Ok(Self {
            config: config.clone(),
            scanner: SourceScanner::new(Box::new(GoParser::new()?)),
            writer: JsonWriter::new(),
        })
    }

    /// Build the output document for `source_dir` without touching the disk
    pub fn collect(&mut self, source_dir: &Path) -> Result<(OutputDocument, ExportSummary)> {
        let packages = self.scanner.scan_directory(source_dir)?;
        let files: usize = packages.iter().map(|p| p.files.len()).sum();
        info!(
            "Parsed {} {} files in {} packages from {}",
            files,
            self.scanner.language_parser().language_name(),
            packages.len(),
            source_dir.display()
        );

        let options = ExtractOptions {
            interface_methods: self.config.expansion_policy.includes_interface_methods(),
            trim_trailing_newlines: self.config.trim_trailing_newlines,
        };
        let extractor = DocExtractor::new(self.scanner.language_parser(), options);
        let mut symbols = extractor.extract(&packages);

        if self.config.sort_by_name {
            symbols.sort_by_cached_key(|symbol| symbol.qualified_name());
        }

        let records = NameExpander::new(self.config.expansion_policy).expand_all(&symbols);
        info!(
            "Found {} documented symbols, {} output records",
            symbols.len(),
            records.len()
        );

        let document = OutputDocument::new(self.config.output_field_name.clone(), records);
        let summary = ExportSummary {
            packages: packages.len(),
            files,
            symbols: symbols.len(),
            records: document.records().len(),
        };

        Ok((document, summary))
    }

    /// Collect and replace `output` with the resulting JSON
    pub fn export(&mut self, source_dir: &Path, output: &Path) -> Result<ExportSummary> {
        let (document, summary) = self.collect(source_dir)?;
        self.writer.write(&document, output)?;

        info!("Wrote {} records to {}", summary.records, output.display());
        Ok(summary)
    }
}
