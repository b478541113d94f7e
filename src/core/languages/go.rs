use std::path::Path;

use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::error::{ExportError, Result};
use super::{
    ExportednessPredicate, FuncDecl, InterfaceMethod, LanguageParser, MethodDecl, ParsedFile,
    TypeDecl,
};

/// Go-specific parser using Tree-sitter
pub struct GoParser {
    parser: Parser,
    directive: Regex,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let go_language = tree_sitter_go::language();
        parser
            .set_language(&go_language)
            .map_err(|e| ExportError::Parser(format!("Failed to set Go language: {}", e)))?;

        // Tool directives such as //go:generate, matched after the slashes
        let directive = Regex::new(r"^(?:line |extern |export |[a-z0-9]+:[a-z0-9])")
            .map_err(|e| ExportError::Parser(format!("Invalid directive pattern: {}", e)))?;

        Ok(Self { parser, directive })
    }
}

impl ExportednessPredicate for GoParser {
    fn is_exported(&self, name: &str) -> bool {
        name.chars().next().is_some_and(char::is_uppercase)
    }
}

impl LanguageParser for GoParser {
    fn parse(&mut self, content: &str, file_path: &Path) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ExportError::parse(file_path, "Failed to parse Go code"))?;

        let root_node = tree.root_node();
        if root_node.has_error() {
            let message = match first_error(root_node) {
                Some(node) => {
                    let position = node.start_position();
                    format!("syntax error at {}:{}", position.row + 1, position.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(ExportError::parse(file_path, message));
        }

        let mut file = ParsedFile {
            path: file_path.to_path_buf(),
            ..ParsedFile::default()
        };

        let mut cursor = root_node.walk();
        for child in root_node.children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = self.package_name(child, content) {
                        file.package = name;
                    }
                }
                "function_declaration" => {
                    if let Some(function) = self.parse_go_function(child, content) {
                        file.functions.push(function);
                    }
                }
                "method_declaration" => {
                    if let Some(method) = self.parse_go_method(child, content) {
                        file.methods.push(method);
                    }
                }
                "type_declaration" => {
                    self.parse_go_type_declaration(child, content, &mut file.types);
                }
                _ => {}
            }
        }

        if file.package.is_empty() {
            return Err(ExportError::parse(file_path, "missing package clause"));
        }

        Ok(file)
    }

    fn file_extension(&self) -> &str {
        "go"
    }

    fn test_file_suffix(&self) -> &str {
        "_test.go"
    }

    fn language_name(&self) -> &str {
        "go"
    }
}

impl GoParser {
    fn package_name(&self, node: Node, source: &str) -> Option<String> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "package_identifier")?;
        Some(self.node_text(name, source))
    }

    fn parse_go_function(&self, node: Node, source: &str) -> Option<FuncDecl> {
        let name = node.child_by_field_name("name")?;

        Some(FuncDecl {
            name: self.node_text(name, source),
            doc: self.extract_lead_comment(node, source),
        })
    }

    fn parse_go_method(&self, node: Node, source: &str) -> Option<MethodDecl> {
        let name = node.child_by_field_name("name")?;
        let receiver = node.child_by_field_name("receiver")?;

        Some(MethodDecl {
            receiver: self.receiver_type_name(receiver, source)?,
            name: self.node_text(name, source),
            doc: self.extract_lead_comment(node, source),
        })
    }

    /// `(s *Stack[T])` -> `Stack`
    fn receiver_type_name(&self, receiver: Node, source: &str) -> Option<String> {
        let mut cursor = receiver.walk();
        let parameter = receiver
            .named_children(&mut cursor)
            .find(|child| child.kind() == "parameter_declaration")?;

        self.base_type_name(parameter.child_by_field_name("type")?, source)
    }

    /// Local type name under pointer, generic and parenthesised wrappers.
    /// Qualified names such as `io.Reader` yield `None`.
    fn base_type_name(&self, mut type_node: Node, source: &str) -> Option<String> {
        loop {
            match type_node.kind() {
                "type_identifier" => return Some(self.node_text(type_node, source)),
                "generic_type" => type_node = type_node.child_by_field_name("type")?,
                "pointer_type" | "parenthesized_type" => {
                    let mut inner_cursor = type_node.walk();
                    type_node = type_node
                        .named_children(&mut inner_cursor)
                        .find(|child| child.kind() != "comment")?;
                }
                _ => return None,
            }
        }
    }

    /// Handles both `type T ...` and grouped `type ( ... )` declarations
    fn parse_go_type_declaration(&self, node: Node, source: &str, types: &mut Vec<TypeDecl>) {
        let mut cursor = node.walk();
        for spec in node.named_children(&mut cursor) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };

            let type_node = spec.child_by_field_name("type");
            let interface_methods = type_node
                .filter(|type_node| type_node.kind() == "interface_type")
                .map(|type_node| {
                    let mut methods = Vec::new();
                    self.parse_go_interface(type_node, source, &mut methods);
                    methods
                });
            let embedded = type_node
                .filter(|type_node| type_node.kind() == "struct_type")
                .map(|type_node| self.embedded_fields(type_node, source))
                .unwrap_or_default();

            types.push(TypeDecl {
                name: self.node_text(name, source),
                interface_methods,
                embedded,
            });
        }
    }

    /// Anonymous fields of a struct: `base`, `*base` and `base[T]` all give `base`
    fn embedded_fields(&self, struct_node: Node, source: &str) -> Vec<String> {
        let mut embedded = Vec::new();
        let mut cursor = struct_node.walk();
        for list in struct_node.named_children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for field in list.named_children(&mut list_cursor) {
                let named = field.child_by_field_name("name").is_some();
                if field.kind() != "field_declaration" || named {
                    continue;
                }
                if let Some(name) = field
                    .child_by_field_name("type")
                    .and_then(|type_node| self.base_type_name(type_node, source))
                {
                    embedded.push(name);
                }
            }
        }
        embedded
    }

    fn parse_go_interface(&self, node: Node, source: &str, methods: &mut Vec<InterfaceMethod>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "method_elem" | "method_spec" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        methods.push(InterfaceMethod {
                            name: self.node_text(name, source),
                            doc: self.extract_lead_comment(child, source),
                        });
                    }
                }
                // Older grammars wrap the elements in a list node
                "method_spec_list" => self.parse_go_interface(child, source, methods),
                _ => {}
            }
        }
    }

    /// Doc text of the comment group that ends on the line right above `node`.
    ///
    /// Comments in a group are at most one line apart. A comment starting on
    /// the line where the preceding token ends belongs to that token instead.
    fn extract_lead_comment(&self, node: Node, source: &str) -> String {
        let mut group: Vec<Node> = Vec::new();
        let mut next_row = node.start_position().row;
        let mut anchor = None;

        let mut sibling = node.prev_sibling();
        while let Some(current) = sibling {
            sibling = current.prev_sibling();
            if is_terminator(current) {
                continue;
            }
            if current.kind() != "comment" {
                anchor = Some(current);
                break;
            }

            let end_row = current.end_position().row;
            let adjacent = if group.is_empty() {
                end_row + 1 == next_row
            } else {
                end_row + 1 >= next_row
            };
            if !adjacent {
                break;
            }

            next_row = current.start_position().row;
            group.push(current);
        }

        if let Some(anchor) = anchor {
            let anchor_row = anchor.end_position().row;
            while group
                .last()
                .is_some_and(|comment| comment.start_position().row == anchor_row)
            {
                group.pop();
            }
        }

        let comments: Vec<&str> = group
            .iter()
            .rev()
            .map(|comment| &source[comment.byte_range()])
            .collect();
        self.comment_text(&comments)
    }

    /// Converts raw comments to doc text.
    ///
    /// Comment markers, directives and trailing whitespace are removed, blank
    /// line runs collapse to one and outer blank lines are dropped. Non-empty
    /// text always ends in a single newline.
    fn comment_text(&self, comments: &[&str]) -> String {
        let mut lines: Vec<String> = Vec::new();

        for comment in comments {
            let raw = comment.replace('\r', "");
            let body = match raw.strip_prefix("//") {
                Some(rest) => match rest.strip_prefix(' ') {
                    Some(rest) => rest,
                    None if self.directive.is_match(rest) => continue,
                    None => rest,
                },
                None => raw
                    .strip_prefix("/*")
                    .and_then(|inner| inner.strip_suffix("*/"))
                    .unwrap_or(raw.as_str()),
            };

            lines.extend(
                body.split('\n')
                    .map(|line| line.trim_end_matches([' ', '\t', '\n', '\r']).to_string()),
            );
        }

        let mut text_lines: Vec<String> = Vec::new();
        for line in lines {
            let previous_blank = text_lines.last().map_or(true, |last| last.is_empty());
            if line.is_empty() && previous_blank {
                continue;
            }
            text_lines.push(line);
        }
        while text_lines.last().is_some_and(|last| last.is_empty()) {
            text_lines.pop();
        }

        if text_lines.is_empty() {
            return String::new();
        }

        let mut text = text_lines.join("\n");
        text.push('\n');
        text
    }

    /// Extract text content of a node
    fn node_text(&self, node: Node, source: &str) -> String {
        source[node.byte_range()].to_string()
    }
}

/// Statement terminators the grammar keeps as anonymous tokens
fn is_terminator(node: Node) -> bool {
    !node.is_named() && matches!(node.kind(), "\n" | ";" | "\0")
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }

    None
}
