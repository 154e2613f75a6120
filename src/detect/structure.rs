//! Structural detectors over the syntax tree.
//!
//! - Oversized functions: definitions spanning more than a line limit
//! - Missing documentation: functions, classes and modules without a docstring
//! - Bare exception handlers: catch-all `except` clauses

use crate::parser::{NodeKind, SyntaxNode, SyntaxTree};

use super::{Detector, DetectorScope, Issue, IssueKind};

/// Flags function definitions whose span (`end - start`) exceeds `max_lines`.
#[derive(Debug, Clone)]
pub struct OversizedFunctionDetector {
    max_lines: usize,
}

impl OversizedFunctionDetector {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }
}

impl Detector for OversizedFunctionDetector {
    fn id(&self) -> &'static str {
        IssueKind::OversizedFunction.as_str()
    }

    fn scope(&self) -> DetectorScope {
        DetectorScope::Tree
    }

    fn detect(&self, tree: &SyntaxTree, _text: &str) -> Vec<Issue> {
        tree.find_all(|n| n.kind.is_definition())
            .filter(|n| n.span.len() > self.max_lines)
            .map(|n| {
                Issue::at_line(
                    IssueKind::OversizedFunction,
                    format!(
                        "Function '{}' is too long ({} lines)",
                        display_name(n),
                        n.span.len()
                    ),
                    n.span.start,
                )
            })
            .collect()
    }
}

/// Flags functions, classes and modules lacking a leading docstring.
///
/// A module is only expected to carry one once it holds two or more
/// top-level statements.
#[derive(Debug, Clone, Default)]
pub struct MissingDocsDetector;

/// Minimum top-level statements before module docs are required.
pub const MODULE_DOC_MIN_STATEMENTS: usize = 2;

impl Detector for MissingDocsDetector {
    fn id(&self) -> &'static str {
        IssueKind::MissingDocumentation.as_str()
    }

    fn scope(&self) -> DetectorScope {
        DetectorScope::Tree
    }

    fn detect(&self, tree: &SyntaxTree, _text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for node in tree.walk() {
            if node.has_docstring() {
                continue;
            }
            match node.kind {
                NodeKind::Module => {
                    if node.statement_count() >= MODULE_DOC_MIN_STATEMENTS {
                        issues.push(Issue::new(
                            IssueKind::MissingDocumentation,
                            "Module is missing a docstring",
                        ));
                    }
                }
                NodeKind::Function { .. } | NodeKind::Class => {
                    issues.push(Issue::at_line(
                        IssueKind::MissingDocumentation,
                        format!(
                            "{} '{}' is missing a docstring",
                            node.kind.label(),
                            display_name(node)
                        ),
                        node.span.start,
                    ));
                }
                _ => {}
            }
        }

        issues
    }
}

/// Flags exception handlers that declare no exception type.
#[derive(Debug, Clone, Default)]
pub struct BareExceptDetector;

impl Detector for BareExceptDetector {
    fn id(&self) -> &'static str {
        IssueKind::BareExceptionHandler.as_str()
    }

    fn scope(&self) -> DetectorScope {
        DetectorScope::Tree
    }

    fn detect(&self, tree: &SyntaxTree, _text: &str) -> Vec<Issue> {
        tree.find_all(|n| matches!(n.kind, NodeKind::ExceptHandler { catch_all: true }))
            .map(|n| {
                Issue::at_line(
                    IssueKind::BareExceptionHandler,
                    "Bare except clause found - specify exception types",
                    n.span.start,
                )
            })
            .collect()
    }
}

fn display_name(node: &SyntaxNode) -> &str {
    node.name.as_deref().unwrap_or("<anonymous>")
}
