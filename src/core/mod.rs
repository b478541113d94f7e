mod engine;
mod expander;
mod extractor;
mod parser;
mod writer;

// Language-specific parsers
mod languages;

pub use expander::{ExpansionPolicy, NameExpander};
pub use extractor::{DocExtractor, ExtractOptions};
pub use languages::GoParser;
pub use parser::SourceScanner;
pub use writer::{JsonWriter, OutputDocument};

// Export the main engine
pub use engine::{Engine, ExportSummary};
