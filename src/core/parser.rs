use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ExportError, Result};
use super::languages::LanguageParser;

/// A parsed source file reduced to the declarations that can carry docs
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Path of the file as it was read
    pub path: PathBuf,

    /// Name from the package clause
    pub package: String,

    /// Top-level functions, in declaration order
    pub functions: Vec<FuncDecl>,

    /// Methods with a receiver, in declaration order
    pub methods: Vec<MethodDecl>,

    /// Named types, in declaration order
    pub types: Vec<TypeDecl>,
}

/// A top-level function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,

    /// Comment text of the lead comment group, empty when undocumented
    pub doc: String,
}

/// A method declaration, keyed by the base name of its receiver type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub receiver: String,
    pub name: String,
    pub doc: String,
}

/// A named type declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,

    /// Method elements when the type is an interface
    pub interface_methods: Option<Vec<InterfaceMethod>>,

    /// Base names of unqualified types embedded in a struct, in field order
    pub embedded: Vec<String>,
}

/// A method element listed inside an interface type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    pub doc: String,
}

/// All files of one directory sharing a package clause
#[derive(Debug, Clone, Default)]
pub struct ParsedPackage {
    pub name: String,
    pub files: Vec<ParsedFile>,
}

/// Reads a single directory and parses every non-test source file in it
pub struct SourceScanner {
    language_parser: Box<dyn LanguageParser>,
}

impl SourceScanner {
    pub fn new(language_parser: Box<dyn LanguageParser>) -> Self {
        Self { language_parser }
    }

    /// The parser in use, which also decides what counts as exported
    pub fn language_parser(&self) -> &dyn LanguageParser {
        self.language_parser.as_ref()
    }

    /// Parse every qualifying file directly inside `dir`, grouped by package.
    ///
    /// Subdirectories are not descended into. The first unreadable or
    /// malformed file aborts the scan. Packages come back ordered by name.
    pub fn scan_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<ParsedPackage>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ExportError::parse(dir, "not a readable directory"));
        }

        let mut packages: BTreeMap<String, ParsedPackage> = BTreeMap::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                ExportError::parse(path, e.to_string())
            })?;

            if entry.file_type().is_dir() || !self.should_parse_file(entry.path()) {
                continue;
            }

            let parsed = self.parse_file(entry.path())?;
            debug!(
                "Parsed {} (package {}): {} funcs, {} methods, {} types",
                parsed.path.display(),
                parsed.package,
                parsed.functions.len(),
                parsed.methods.len(),
                parsed.types.len()
            );

            packages
                .entry(parsed.package.clone())
                .or_insert_with(|| ParsedPackage {
                    name: parsed.package.clone(),
                    files: Vec::new(),
                })
                .files
                .push(parsed);
        }

        Ok(packages.into_values().collect())
    }

    /// Parse a single source file
    pub fn parse_file<P: AsRef<Path>>(&mut self, file_path: P) -> Result<ParsedFile> {
        let path = file_path.as_ref();
        let source_content = std::fs::read_to_string(path)
            .map_err(|e| ExportError::parse(path, e.to_string()))?;

        self.language_parser.parse(&source_content, path)
    }

    /// Source extension matches and the name is not a test file
    fn should_parse_file(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };

        let extension = format!(".{}", self.language_parser.file_extension());
        file_name.ends_with(&extension)
            && !file_name.ends_with(self.language_parser.test_file_suffix())
    }
}
