//! Language-specific parsers
//!
//! Each language gets its own module with a consistent interface for turning
//! source text into the declarations the extractor looks at.

mod go;

pub use go::GoParser;

use crate::error::Result;
use super::parser::{FuncDecl, InterfaceMethod, MethodDecl, ParsedFile, TypeDecl};

/// Decides whether a declared name is visible outside its package
pub trait ExportednessPredicate {
    fn is_exported(&self, name: &str) -> bool;
}

/// Trait that all language parsers must implement
pub trait LanguageParser: ExportednessPredicate {
    /// Parse one file. Any syntax error is a hard failure.
    fn parse(&mut self, content: &str, file_path: &std::path::Path) -> Result<ParsedFile>;

    /// Extension of source files, without the dot
    fn file_extension(&self) -> &str;

    /// File name suffix marking test files, which are never parsed
    fn test_file_suffix(&self) -> &str;

    /// Get the language name
    fn language_name(&self) -> &str;
}
