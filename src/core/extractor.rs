use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::languages::ExportednessPredicate;
use super::parser::{FuncDecl, MethodDecl, ParsedPackage, TypeDecl};

/// Merged method declarations keyed by receiver base name, then method name
type MethodSets<'p> = BTreeMap<&'p str, BTreeMap<&'p str, &'p MethodDecl>>;

/// What kind of declaration a documented symbol came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Method,
    InterfaceMethod,
}

/// An exported, documented declaration found in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedSymbol {
    pub kind: SymbolKind,

    /// Owning type for methods and interface methods
    pub type_name: Option<String>,

    pub member_name: String,

    pub documentation: String,
}

impl DocumentedSymbol {
    /// `Func`, `Type.Method` or `TypeMethod` depending on the kind
    pub fn qualified_name(&self) -> String {
        match (self.kind, &self.type_name) {
            (SymbolKind::Method, Some(type_name)) => format!("{}.{}", type_name, self.member_name),
            (SymbolKind::InterfaceMethod, Some(type_name)) => {
                format!("{}{}", type_name, self.member_name)
            }
            _ => self.member_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Collect documented method elements of interface types
    pub interface_methods: bool,

    /// Strip trailing `\r` and `\n` from doc text
    pub trim_trailing_newlines: bool,
}

/// Collects exported, documented functions and methods package by package
pub struct DocExtractor<'a, P: ExportednessPredicate + ?Sized> {
    exported: &'a P,
    options: ExtractOptions,
}

impl<'a, P: ExportednessPredicate + ?Sized> DocExtractor<'a, P> {
    pub fn new(exported: &'a P, options: ExtractOptions) -> Self {
        Self { exported, options }
    }

    /// Walk every package in the given order and collect its symbols
    pub fn extract(&self, packages: &[ParsedPackage]) -> Vec<DocumentedSymbol> {
        let mut symbols = Vec::new();
        for package in packages {
            let before = symbols.len();
            self.extract_package(package, &mut symbols);
            debug!(
                "Package {}: {} documented symbols",
                package.name,
                symbols.len() - before
            );
        }
        symbols
    }

    /// Functions by name, then each declared type by name with its methods by
    /// name followed by its interface methods in declaration order.
    fn extract_package(&self, package: &ParsedPackage, symbols: &mut Vec<DocumentedSymbol>) {
        let mut functions: BTreeMap<&str, &FuncDecl> = BTreeMap::new();
        for function in package.files.iter().flat_map(|f| &f.functions) {
            merge_declaration(&mut functions, &function.name, function, |f| !f.doc.is_empty());
        }

        for function in functions.into_values() {
            if self.exported.is_exported(&function.name) && !function.doc.is_empty() {
                symbols.push(DocumentedSymbol {
                    kind: SymbolKind::Function,
                    type_name: None,
                    member_name: function.name.clone(),
                    documentation: self.doc_text(&function.doc),
                });
            }
        }

        let mut types: BTreeMap<&str, &TypeDecl> = BTreeMap::new();
        for type_decl in package.files.iter().flat_map(|f| &f.types) {
            types.entry(type_decl.name.as_str()).or_insert(type_decl);
        }

        let mut methods: MethodSets = BTreeMap::new();
        for method in package.files.iter().flat_map(|f| &f.methods) {
            let set = methods.entry(method.receiver.as_str()).or_default();
            merge_declaration(set, &method.name, method, |m| !m.doc.is_empty());
        }

        for (&type_name, &type_decl) in &types {
            if !self.exported.is_exported(type_name) {
                continue;
            }

            for method in self.method_set(type_name, &types, &methods) {
                if self.exported.is_exported(&method.name) && !method.doc.is_empty() {
                    symbols.push(DocumentedSymbol {
                        kind: SymbolKind::Method,
                        type_name: Some(type_name.to_string()),
                        member_name: method.name.clone(),
                        documentation: self.doc_text(&method.doc),
                    });
                }
            }

            if !self.options.interface_methods {
                continue;
            }
            for method in type_decl.interface_methods.iter().flatten() {
                if self.exported.is_exported(&method.name) && !method.doc.is_empty() {
                    symbols.push(DocumentedSymbol {
                        kind: SymbolKind::InterfaceMethod,
                        type_name: Some(type_name.to_string()),
                        member_name: method.name.clone(),
                        documentation: self.doc_text(&method.doc),
                    });
                }
            }
        }

        for (receiver, orphaned) in methods.iter().filter(|(r, _)| !types.contains_key(*r)) {
            debug!(
                "Ignoring {} methods on {} which is not declared in package {}",
                orphaned.len(),
                receiver,
                package.name
            );
        }
    }

    /// Methods declared on `type_name` plus those promoted from embedded
    /// unexported types, sorted by name.
    ///
    /// A promoted method never replaces one at a shallower depth. Two
    /// promoted methods with the same name at the same depth cancel out.
    fn method_set<'p>(
        &self,
        type_name: &'p str,
        types: &BTreeMap<&'p str, &'p TypeDecl>,
        methods: &MethodSets<'p>,
    ) -> Vec<&'p MethodDecl> {
        let mut set: BTreeMap<&str, Promoted> = BTreeMap::new();
        for (&name, &method) in methods.get(type_name).into_iter().flatten() {
            let own = Promoted {
                depth: 0,
                method: Some(method),
            };
            set.insert(name, own);
        }

        let mut visited = HashSet::new();
        collect_embedded(type_name, 1, types, methods, &mut visited, &mut set);

        // Methods promoted from exported types are documented on those types
        set.into_values()
            .filter(|promoted| {
                promoted.depth == 0
                    || promoted
                        .method
                        .is_some_and(|method| !self.exported.is_exported(&method.receiver))
            })
            .filter_map(|promoted| promoted.method)
            .collect()
    }

    fn doc_text(&self, doc: &str) -> String {
        if self.options.trim_trailing_newlines {
            doc.trim_end_matches(['\r', '\n']).to_string()
        } else {
            doc.to_string()
        }
    }
}

/// A method reachable from a type and the embedding depth it was found at.
/// `method` is `None` when two methods of that name collide at one depth.
struct Promoted<'p> {
    depth: usize,
    method: Option<&'p MethodDecl>,
}

/// Keep one declaration per name across files. The first documented one
/// wins; an undocumented one is replaced by any later declaration.
fn merge_declaration<'p, T>(
    set: &mut BTreeMap<&'p str, &'p T>,
    name: &'p str,
    decl: &'p T,
    documented: impl Fn(&T) -> bool,
) {
    if set.get(name).is_some_and(|&existing| documented(existing)) {
        debug!("Keeping the first documented declaration of {}", name);
        return;
    }
    set.insert(name, decl);
}

/// Add the declared methods of every type embedded in `type_name`, then
/// recurse into those types one level deeper.
fn collect_embedded<'p>(
    type_name: &'p str,
    depth: usize,
    types: &BTreeMap<&'p str, &'p TypeDecl>,
    methods: &MethodSets<'p>,
    visited: &mut HashSet<&'p str>,
    set: &mut BTreeMap<&'p str, Promoted<'p>>,
) {
    let Some(&type_decl) = types.get(type_name) else {
        return;
    };
    visited.insert(type_name);

    for embedded in &type_decl.embedded {
        let embedded = embedded.as_str();
        if !types.contains_key(embedded) {
            continue;
        }

        for (&name, &method) in methods.get(embedded).into_iter().flatten() {
            let promoted = Promoted {
                depth,
                method: Some(method),
            };
            match set.get_mut(name) {
                None => {
                    set.insert(name, promoted);
                }
                Some(existing) if depth < existing.depth => *existing = promoted,
                Some(existing) if depth == existing.depth => existing.method = None,
                Some(_) => {}
            }
        }

        if !visited.contains(embedded) {
            collect_embedded(embedded, depth + 1, types, methods, visited, set);
        }
    }

    visited.remove(type_name);
}
