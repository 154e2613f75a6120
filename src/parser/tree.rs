//! Language-neutral syntax tree produced by a [`TreeBuilder`](super::TreeBuilder).
//!
//! The tree keeps only what the metric collector and the detectors need:
//! a node classification, an optional name, a 1-based line span, the
//! attached docstring and the ordered children. It is built once per
//! analysis and never mutated afterwards.

use std::collections::VecDeque;

use serde::Serialize;

/// Logical operator of a boolean combinator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    And,
    Or,
}

/// Classification of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a source unit.
    Module,
    /// Function or method definition.
    Function { is_async: bool },
    /// Class or type definition.
    Class,
    /// `if` / `elif` style branch.
    Conditional,
    /// `for` / `while` style loop.
    Loop { is_async: bool },
    /// Boolean combinator over `operands` operands.
    ///
    /// Grammars that emit nested binary nodes produce `operands: 2` per
    /// node; grammars with a flat n-ary form produce one node with the
    /// full operand count.
    BooleanOp { operator: BoolOperator, operands: usize },
    /// `try` construct; handlers are its `ExceptHandler` children.
    Try,
    /// Exception handler clause. `catch_all` is set when no exception
    /// type is declared.
    ExceptHandler { catch_all: bool },
    /// Anything the analysis does not classify.
    Other,
}

impl NodeKind {
    pub fn is_definition(&self) -> bool {
        matches!(self, NodeKind::Function { .. })
    }

    /// Human label used in issue messages.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Function { .. } => "Function",
            NodeKind::Class => "Class",
            NodeKind::Conditional => "Conditional",
            NodeKind::Loop { .. } => "Loop",
            NodeKind::BooleanOp { .. } => "Boolean operator",
            NodeKind::Try => "Try",
            NodeKind::ExceptHandler { .. } => "Except handler",
            NodeKind::Other => "Node",
        }
    }
}

/// Inclusive 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Distance between the last and the first line (`end - start`).
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Node type as named by the grammar that produced it.
    pub grammar_kind: &'static str,
    pub name: Option<String>,
    pub span: LineSpan,
    /// Leading documentation string, if the node carries one.
    pub docstring: Option<String>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, grammar_kind: &'static str, span: LineSpan) -> Self {
        Self {
            kind,
            grammar_kind,
            name: None,
            span,
            docstring: None,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_docstring(mut self, doc: impl Into<String>) -> Self {
        self.docstring = Some(doc.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_docstring(&self) -> bool {
        self.docstring
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }

    /// Number of exception handlers directly attached to this node.
    pub fn handler_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, NodeKind::ExceptHandler { .. }))
            .count()
    }

    /// Number of direct children that are statements of interest
    /// (everything except grammar comments).
    pub fn statement_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| c.grammar_kind != "comment")
            .count()
    }
}

/// A parsed source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Breadth-first iterator over every node, root first.
    pub fn walk(&self) -> Walk<'_> {
        let mut queue = VecDeque::new();
        queue.push_back(&self.root);
        Walk { queue }
    }

    /// All nodes matching `pred`, in breadth-first order.
    pub fn find_all<F>(&self, pred: F) -> impl Iterator<Item = &SyntaxNode>
    where
        F: Fn(&SyntaxNode) -> bool,
    {
        self.walk().filter(move |n| pred(n))
    }
}

/// Breadth-first traversal returned by [`SyntaxTree::walk`].
pub struct Walk<'a> {
    queue: VecDeque<&'a SyntaxNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.iter());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, start: usize, end: usize, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(
            NodeKind::Function { is_async: false },
            "function_definition",
            LineSpan::new(start, end),
        )
        .with_name(name)
        .with_children(children)
    }

    #[test]
    fn test_walk_is_breadth_first() {
        let inner = func("inner", 2, 3, vec![]);
        let outer = func("outer", 1, 3, vec![inner]);
        let other = func("other", 5, 6, vec![]);
        let root = SyntaxNode::new(NodeKind::Module, "module", LineSpan::new(1, 6))
            .with_children(vec![outer, other]);
        let tree = SyntaxTree::new(root);

        let names: Vec<_> = tree
            .walk()
            .filter_map(|n| n.name.as_deref())
            .collect();
        assert_eq!(names, vec!["outer", "other", "inner"]);
    }

    #[test]
    fn test_line_span_never_negative() {
        let span = LineSpan::new(10, 4);
        assert_eq!(span.end, 10);
        assert_eq!(span.len(), 0);
        assert!(span.is_empty());
    }

    #[test]
    fn test_handler_count() {
        let handler = |catch_all| {
            SyntaxNode::new(
                NodeKind::ExceptHandler { catch_all },
                "except_clause",
                LineSpan::new(3, 4),
            )
        };
        let body = SyntaxNode::new(NodeKind::Other, "block", LineSpan::new(2, 2));
        let try_node = SyntaxNode::new(NodeKind::Try, "try_statement", LineSpan::new(1, 6))
            .with_children(vec![body, handler(false), handler(true)]);
        assert_eq!(try_node.handler_count(), 2);
    }

    #[test]
    fn test_blank_docstring_is_missing() {
        let node = SyntaxNode::new(NodeKind::Class, "class_definition", LineSpan::new(1, 2))
            .with_docstring("   ");
        assert!(!node.has_docstring());
    }
}
