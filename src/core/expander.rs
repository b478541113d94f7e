use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::extractor::{DocumentedSymbol, SymbolKind};

/// How many output names each documented symbol is published under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionPolicy {
    /// One record per symbol under its qualified name; interface methods are skipped
    None,

    /// Functions and methods also get `Ex` and `Async` variants; interface methods are skipped
    Function3,

    /// As `function3`, plus interface methods with `Ex`, `Interface` and `Async` variants
    #[default]
    Interface4,
}

impl ExpansionPolicy {
    /// Whether interface method elements are collected at all
    pub fn includes_interface_methods(self) -> bool {
        matches!(self, Self::Interface4)
    }

    /// Name suffixes for one symbol kind, in emission order
    pub fn suffixes(self, kind: SymbolKind) -> &'static [&'static str] {
        match (self, kind) {
            (Self::None, _) => &[""],
            (Self::Interface4, SymbolKind::InterfaceMethod) => &["", "Ex", "Interface", "Async"],
            _ => &["", "Ex", "Async"],
        }
    }
}

impl std::str::FromStr for ExpansionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ExpansionPolicy::None),
            "function3" => Ok(ExpansionPolicy::Function3),
            "interface4" => Ok(ExpansionPolicy::Interface4),
            _ => Err(format!(
                "Unknown expansion policy: {} (expected none, function3 or interface4)",
                s
            )),
        }
    }
}

/// One `{name, doc}` entry of the exported document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub name: String,
    pub doc: String,
}

pub struct NameExpander {
    policy: ExpansionPolicy,
}

impl NameExpander {
    pub fn new(policy: ExpansionPolicy) -> Self {
        Self { policy }
    }

    /// Records for a single symbol; every record shares the symbol's doc text.
    /// For `Type.Method` the suffix lands on the method segment.
    pub fn expand(&self, symbol: &DocumentedSymbol) -> Vec<OutputRecord> {
        let base = symbol.qualified_name();
        self.policy
            .suffixes(symbol.kind)
            .iter()
            .map(|suffix| OutputRecord {
                name: format!("{}{}", base, suffix),
                doc: symbol.documentation.clone(),
            })
            .collect()
    }

    /// Expand all symbols in order. Colliding names are kept as separate
    /// records and reported once per name.
    pub fn expand_all(&self, symbols: &[DocumentedSymbol]) -> Vec<OutputRecord> {
        let records: Vec<OutputRecord> = symbols.iter().flat_map(|s| self.expand(s)).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &records {
            *counts.entry(record.name.as_str()).or_default() += 1;
        }
        for record in &records {
            if let Some(count) = counts.remove(record.name.as_str()) {
                if count > 1 {
                    warn!("Output name {} appears {} times", record.name, count);
                }
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(
        kind: SymbolKind,
        type_name: Option<&str>,
        member: &str,
        doc: &str,
    ) -> DocumentedSymbol {
        DocumentedSymbol {
            kind,
            type_name: type_name.map(str::to_string),
            member_name: member.to_string(),
            documentation: doc.to_string(),
        }
    }

    fn names(records: &[OutputRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_function_expands_to_three_records() {
        let expander = NameExpander::new(ExpansionPolicy::Interface4);
        let add = symbol(SymbolKind::Function, None, "Add", "Add sums two integers.");
        let records = expander.expand(&add);

        assert_eq!(names(&records), vec!["Add", "AddEx", "AddAsync"]);
        assert!(records.iter().all(|r| r.doc == "Add sums two integers."));
    }

    #[test]
    fn test_method_suffix_applies_to_method_segment() {
        let expander = NameExpander::new(ExpansionPolicy::Function3);
        let read = symbol(SymbolKind::Method, Some("File"), "Read", "Read reads.");
        let records = expander.expand(&read);

        assert_eq!(names(&records), vec!["File.Read", "File.ReadEx", "File.ReadAsync"]);
    }

    #[test]
    fn test_interface_method_expands_to_four_records() {
        let expander = NameExpander::new(ExpansionPolicy::Interface4);
        let records = expander.expand(&symbol(
            SymbolKind::InterfaceMethod,
            Some("Reader"),
            "Read",
            "Read reads.",
        ));

        assert_eq!(
            names(&records),
            vec!["ReaderRead", "ReaderReadEx", "ReaderReadInterface", "ReaderReadAsync"]
        );
        assert!(records.iter().all(|r| r.doc == "Read reads."));
    }

    #[test]
    fn test_none_policy_keeps_qualified_name() {
        let expander = NameExpander::new(ExpansionPolicy::None);

        let function = expander.expand(&symbol(SymbolKind::Function, None, "Add", "doc"));
        let method = expander.expand(&symbol(SymbolKind::Method, Some("File"), "Read", "doc"));

        assert_eq!(names(&function), vec!["Add"]);
        assert_eq!(names(&method), vec!["File.Read"]);
        assert!(!ExpansionPolicy::None.includes_interface_methods());
        assert!(!ExpansionPolicy::Function3.includes_interface_methods());
        assert!(ExpansionPolicy::Interface4.includes_interface_methods());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("function3".parse::<ExpansionPolicy>(), Ok(ExpansionPolicy::Function3));
        assert_eq!("Interface4".parse::<ExpansionPolicy>(), Ok(ExpansionPolicy::Interface4));
        assert!("all".parse::<ExpansionPolicy>().is_err());
    }

    #[test]
    fn test_colliding_names_are_kept() {
        let expander = NameExpander::new(ExpansionPolicy::Function3);
        let symbols = vec![
            symbol(SymbolKind::Function, None, "Foo", "Foo does foo."),
            symbol(SymbolKind::Function, None, "FooEx", "FooEx does more."),
        ];

        let records = expander.expand_all(&symbols);

        assert_eq!(records.len(), 6);
        let foo_ex: Vec<_> = records.iter().filter(|r| r.name == "FooEx").collect();
        assert_eq!(foo_ex.len(), 2);
        assert_eq!(foo_ex[0].doc, "Foo does foo.");
        assert_eq!(foo_ex[1].doc, "FooEx does more.");
    }
}
