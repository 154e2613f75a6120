//! Python language configuration for tree-sitter parsing.

use tree_sitter::Node;

use crate::parser::treesitter::{Config, TreeSitterBuilder};
use crate::parser::{BoolOperator, Language, NodeKind, ParseFailure, TreeBuilder};

/// Classify Python grammar nodes.
///
/// `elif` clauses are branches of their own. Conditional expressions and
/// comprehension filters are not counted as branches.
fn classify(node: Node<'_>, _source: &[u8]) -> NodeKind {
    match node.kind() {
        "module" => NodeKind::Module,
        "function_definition" => NodeKind::Function {
            is_async: has_async_keyword(node),
        },
        "class_definition" => NodeKind::Class,
        "if_statement" | "elif_clause" => NodeKind::Conditional,
        "for_statement" => NodeKind::Loop {
            is_async: has_async_keyword(node),
        },
        "while_statement" => NodeKind::Loop { is_async: false },
        // The grammar nests chains: `a and b and c` is two binary nodes.
        "boolean_operator" => NodeKind::BooleanOp {
            operator: boolean_operator(node),
            operands: 2,
        },
        "try_statement" => NodeKind::Try,
        "except_clause" | "except_group_clause" => NodeKind::ExceptHandler {
            catch_all: is_bare_except(node),
        },
        _ => NodeKind::Other,
    }
}

fn has_async_keyword(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "async");
    found
}

fn boolean_operator(node: Node<'_>) -> BoolOperator {
    match node.child_by_field_name("operator").map(|op| op.kind()) {
        Some("or") => BoolOperator::Or,
        _ => BoolOperator::And,
    }
}

/// `except:` with nothing between the keyword and the colon.
fn is_bare_except(node: Node<'_>) -> bool {
    if node.kind() != "except_clause" {
        return false;
    }
    let mut cursor = node.walk();
    let bare = node
        .named_children(&mut cursor)
        .all(|c| matches!(c.kind(), "block" | "comment"));
    bare
}

/// Statement kinds whose suite sits in the `body` field.
const BODY_STATEMENTS: &[&str] = &[
    "function_definition",
    "class_definition",
    "for_statement",
    "while_statement",
    "with_statement",
    "try_statement",
    "else_clause",
];

/// Statement kinds whose suite sits in the `consequence` field.
const CONSEQUENCE_STATEMENTS: &[&str] = &["if_statement", "elif_clause"];

/// Reject Python 2 statements and suites with no statement in them.
///
/// The grammar accepts `print x`, `exec code` and a compound header with
/// no indented body; the language does not.
fn validate(node: Node<'_>, _source: &[u8]) -> Result<(), ParseFailure> {
    let line = node.start_position().row + 1;
    match node.kind() {
        "print_statement" => Err(ParseFailure::at_line(
            "missing parentheses in call to 'print'",
            line,
        )),
        "exec_statement" => Err(ParseFailure::at_line(
            "missing parentheses in call to 'exec'",
            line,
        )),
        "block" if !has_statement(node) => {
            let header = node.parent().unwrap_or(node);
            Err(indentation_failure(header))
        }
        kind if BODY_STATEMENTS.contains(&kind) && node.child_by_field_name("body").is_none() => {
            Err(indentation_failure(node))
        }
        kind if CONSEQUENCE_STATEMENTS.contains(&kind)
            && node.child_by_field_name("consequence").is_none() =>
        {
            Err(indentation_failure(node))
        }
        _ => Ok(()),
    }
}

fn has_statement(block: Node<'_>) -> bool {
    let mut cursor = block.walk();
    let found = block
        .named_children(&mut cursor)
        .any(|c| c.kind() != "comment");
    found
}

fn indentation_failure(header: Node<'_>) -> ParseFailure {
    ParseFailure::at_line(
        "expected an indented block",
        header.start_position().row + 1,
    )
}

/// Leading docstring of a module, function or class.
///
/// The first non-comment statement must be a bare, non-formatted,
/// non-bytes string literal.
fn docstring(node: Node<'_>, source: &[u8]) -> Option<String> {
    let body = if node.kind() == "module" {
        node
    } else {
        node.child_by_field_name("body")?
    };

    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }

    let mut expr = first.named_child(0)?;
    while expr.kind() == "parenthesized_expression" {
        let mut cursor = expr.walk();
        let inner = expr
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect::<Vec<_>>();
        match inner.as_slice() {
            [only] => expr = *only,
            _ => return None,
        }
    }

    string_literal(expr, source)
}

fn string_literal(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => {
            let mut cursor = node.walk();
            let mut content_start = node.start_byte();
            let mut content_end = node.end_byte();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "string_start" => {
                        let prefix = child.utf8_text(source).unwrap_or("").to_lowercase();
                        if prefix.contains('f') || prefix.contains('b') {
                            return None;
                        }
                        content_start = child.end_byte();
                    }
                    "string_end" => content_end = child.start_byte(),
                    "interpolation" => return None,
                    _ => {}
                }
            }
            let bytes = source.get(content_start..content_end.max(content_start))?;
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .map(|part| string_literal(part, source))
                .collect::<Option<Vec<_>>>()?;
            Some(parts.concat())
        }
        _ => None,
    }
}

/// Create a new Python tree builder.
pub fn new_builder() -> Box<dyn TreeBuilder> {
    Box::new(TreeSitterBuilder::new(Config {
        grammar: tree_sitter_python::LANGUAGE.into(),
        language: Language::Python,
        classify,
        docstring,
        validate,
        name_field: "name",
        comment_kind: "comment",
    }))
}
