//! Tree-sitter based tree builder.
//!
//! This module provides a generic tree-sitter builder that can be configured
//! for different languages via a node classifier and a docstring extractor.

use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser, Point};

use super::{Language, LineSpan, NodeKind, ParseFailure, SyntaxNode, SyntaxTree, TreeBuilder};

/// Maps a grammar node to its analysis classification.
pub type Classifier = fn(Node<'_>, &[u8]) -> NodeKind;

/// Extracts the leading documentation string of a module, function or class node.
pub type DocstringExtractor = fn(Node<'_>, &[u8]) -> Option<String>;

/// Rejects a node the grammar accepts but the language does not.
///
/// Called for every node of an error-free tree, in document order.
pub type Validator = fn(Node<'_>, &[u8]) -> Result<(), ParseFailure>;

/// Configuration for a tree-sitter language builder.
#[derive(Clone)]
pub struct Config {
    /// The tree-sitter grammar
    pub grammar: TsLanguage,
    /// Language this grammar parses
    pub language: Language,
    /// Node classification for the grammar's node types
    pub classify: Classifier,
    /// Docstring lookup for documentable nodes
    pub docstring: DocstringExtractor,
    /// Language-level checks the grammar is too lenient for
    pub validate: Validator,
    /// Field holding the identifier of functions and classes
    pub name_field: &'static str,
    /// Node kind of comments, which never extend a definition's span
    pub comment_kind: &'static str,
}

/// Tree-sitter based builder.
pub struct TreeSitterBuilder {
    config: Config,
}

impl TreeSitterBuilder {
    /// Create a new tree-sitter builder with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse source code and return the raw tree-sitter tree.
    fn parse(&self, source: &[u8]) -> Result<tree_sitter::Tree, ParseFailure> {
        let mut parser = TsParser::new();
        parser.set_language(&self.config.grammar).map_err(|e| {
            ParseFailure::new(format!(
                "grammar for {} could not be loaded: {}",
                self.config.language, e
            ))
        })?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseFailure::new("parser produced no tree"))
    }

    /// Convert a tree-sitter node and its named descendants.
    fn convert(&self, node: Node<'_>, source: &[u8]) -> SyntaxNode {
        let kind = (self.config.classify)(node, source);
        let span = if matches!(kind, NodeKind::Function { .. } | NodeKind::Class) {
            code_span_of(node, self.config.comment_kind)
        } else {
            span_of(node)
        };
        let mut converted = SyntaxNode::new(kind, node.kind(), span);

        if matches!(kind, NodeKind::Function { .. } | NodeKind::Class) {
            if let Some(name) = node.child_by_field_name(self.config.name_field) {
                converted = converted.with_name(name.utf8_text(source).unwrap_or(""));
            }
        }

        if matches!(
            kind,
            NodeKind::Module | NodeKind::Function { .. } | NodeKind::Class
        ) {
            if let Some(doc) = (self.config.docstring)(node, source) {
                converted = converted.with_docstring(doc);
            }
        }

        let mut cursor = node.walk();
        let children = node
            .named_children(&mut cursor)
            .map(|child| self.convert(child, source))
            .collect();

        converted.with_children(children)
    }
}

impl TreeBuilder for TreeSitterBuilder {
    fn language(&self) -> Language {
        self.config.language
    }

    fn build(&self, text: &str) -> Result<SyntaxTree, ParseFailure> {
        let source = text.as_bytes();
        let tree = self.parse(source)?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(match first_error(root) {
                Some(node) if node.is_missing() => ParseFailure::at_line(
                    format!("missing '{}'", node.kind()),
                    node.start_position().row + 1,
                ),
                Some(node) => {
                    ParseFailure::at_line("invalid syntax", node.start_position().row + 1)
                }
                None => ParseFailure::new("invalid syntax"),
            });
        }

        validate_tree(root, source, self.config.validate)?;

        Ok(SyntaxTree::new(self.convert(root, source)))
    }
}

/// 1-based inclusive line span of a node.
///
/// A node ending at column 0 of a later row ends on the previous row.
pub fn span_of(node: Node<'_>) -> LineSpan {
    let start = node.start_position();
    let end = node.end_position();
    let last_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    LineSpan::new(start.row + 1, last_row + 1)
}

/// Line span of a definition, ending at its last non-comment token.
///
/// Comments trailing the body belong to the grammar's block but not to
/// the definition.
pub fn code_span_of(node: Node<'_>, comment_kind: &str) -> LineSpan {
    match last_code_point(node, comment_kind) {
        Some(end) => LineSpan::new(node.start_position().row + 1, end.row + 1),
        None => span_of(node),
    }
}

/// End point of the last non-empty, non-comment token under `node`.
fn last_code_point(node: Node<'_>, comment_kind: &str) -> Option<Point> {
    if node.kind() == comment_kind {
        return None;
    }
    if node.child_count() == 0 {
        return (node.end_byte() > node.start_byte()).then(|| node.end_position());
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .rev()
        .find_map(|child| last_code_point(child, comment_kind))
}

/// Run `validate` over every node in document order, stopping at the first failure.
fn validate_tree(
    root: Node<'_>,
    source: &[u8],
    validate: Validator,
) -> Result<(), ParseFailure> {
    let mut cursor = root.walk();
    loop {
        validate(cursor.node(), source)?;
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
        }
    }
}

/// First ERROR or MISSING node in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
