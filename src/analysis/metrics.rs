//! Quantitative metrics derived from a syntax tree.

use serde::{Deserialize, Serialize};

use crate::parser::{NodeKind, SyntaxNode, SyntaxTree};

/// Base cyclomatic complexity of any source unit.
pub const BASE_COMPLEXITY: usize = 1;

/// Size of one function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSize {
    pub name: String,
    /// First line of the definition (1-indexed).
    pub line: usize,
    /// Span of the definition, `end - start`.
    pub lines: usize,
}

/// Metrics for one source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub line_count: usize,
    pub definition_count: usize,
    pub complexity: usize,
    pub definitions: Vec<DefinitionSize>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            line_count: 0,
            definition_count: 0,
            complexity: BASE_COMPLEXITY,
            definitions: Vec::new(),
        }
    }
}

impl Metrics {
    /// Collect all metrics for a parsed source unit.
    pub fn collect(tree: &SyntaxTree, text: &str) -> Self {
        Metrics {
            line_count: count_lines(text),
            definition_count: definition_count(tree),
            complexity: cyclomatic_complexity(tree),
            definitions: definition_sizes(tree),
        }
    }
}

/// Number of newline-delimited lines.
///
/// A trailing newline does not open a new line; content after the last
/// newline counts as one.
pub fn count_lines(text: &str) -> usize {
    text.lines().count()
}

/// Cyclomatic complexity of the whole tree.
pub fn cyclomatic_complexity(tree: &SyntaxTree) -> usize {
    BASE_COMPLEXITY
        + tree
            .walk()
            .map(complexity_contribution)
            .sum::<usize>()
}

/// Number of function definitions at any depth.
pub fn definition_count(tree: &SyntaxTree) -> usize {
    tree.walk().filter(|n| n.kind.is_definition()).count()
}

/// Size of every function definition, in breadth-first order.
pub fn definition_sizes(tree: &SyntaxTree) -> Vec<DefinitionSize> {
    tree.find_all(|n| n.kind.is_definition())
        .map(|node| DefinitionSize {
            name: node.name.clone().unwrap_or_default(),
            line: node.span.start,
            lines: node.span.len(),
        })
        .collect()
}

/// Decision points a single node adds.
///
/// Boolean combinators add `operands - 1`, which is 1 for a binary node,
/// so nested binary chains and flat n-ary chains score the same.
/// Handlers are counted through their `try`, not on their own.
fn complexity_contribution(node: &SyntaxNode) -> usize {
    match node.kind {
        NodeKind::Conditional | NodeKind::Loop { .. } => 1,
        NodeKind::BooleanOp { operands, .. } => operands.saturating_sub(1),
        NodeKind::Try => node.handler_count(),
        _ => 0,
    }
}
