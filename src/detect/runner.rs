//! Detection runner that orchestrates all registered detectors.

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::parser::SyntaxTree;

use super::{
    BareExceptDetector, Issue, LongLineDetector, MagicNumberDetector, MissingDocsDetector,
    OversizedFunctionDetector,
};

/// What a detector inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorScope {
    /// Structural checks over the syntax tree.
    Tree,
    /// Line-by-line checks over the raw text.
    Text,
}

/// A single, independent issue heuristic.
///
/// Detectors are pure: the same tree and text always yield the same issues.
pub trait Detector: Send + Sync {
    /// Stable identifier, e.g. `"long-line"`.
    fn id(&self) -> &'static str;

    fn scope(&self) -> DetectorScope;

    fn detect(&self, tree: &SyntaxTree, text: &str) -> Vec<Issue>;
}

/// Ordered registry of detectors.
///
/// Tree-scope issues come first, in registration order. Text-scope issues
/// follow, ordered by ascending line; issues on the same line keep the
/// registration order of their detectors.
pub struct Runner {
    detectors: Vec<Box<dyn Detector>>,
}

impl Runner {
    /// Create a runner with no detectors.
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Create a runner with the built-in detectors configured from `config`.
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::empty()
            .with(OversizedFunctionDetector::new(config.max_function_lines()))
            .with(MissingDocsDetector)
            .with(BareExceptDetector)
            .with(MagicNumberDetector)
            .with(LongLineDetector::new(config.max_line_length()))
    }

    /// Register an additional detector after the existing ones.
    pub fn with<D: Detector + 'static>(mut self, detector: D) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Identifiers of the registered detectors, in registration order.
    pub fn detector_ids(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    /// Run every detector against a parsed source unit.
    pub fn run(&self, tree: &SyntaxTree, text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut text_issues = Vec::new();

        for detector in &self.detectors {
            let found = detector.detect(tree, text);
            debug!(detector = detector.id(), count = found.len(), "detector finished");
            match detector.scope() {
                DetectorScope::Tree => issues.extend(found),
                DetectorScope::Text => text_issues.extend(found),
            }
        }

        text_issues.sort_by_key(|issue| issue.line.unwrap_or(0));
        issues.extend(text_issues);
        issues
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::IssueKind;
    use crate::parser::{LineSpan, NodeKind, SyntaxNode};

    struct EveryLine(IssueKind, DetectorScope);

    impl Detector for EveryLine {
        fn id(&self) -> &'static str {
            self.0.as_str()
        }

        fn scope(&self) -> DetectorScope {
            self.1
        }

        fn detect(&self, _tree: &SyntaxTree, text: &str) -> Vec<Issue> {
            (1..=text.lines().count())
                .map(|line| Issue::at_line(self.0, "hit", line))
                .collect()
        }
    }

    fn empty_tree() -> SyntaxTree {
        SyntaxTree::new(SyntaxNode::new(
            NodeKind::Module,
            "module",
            LineSpan::new(1, 1),
        ))
    }

    #[test]
    fn test_default_registry_order() {
        let runner = Runner::default();
        assert_eq!(
            runner.detector_ids(),
            vec![
                "oversized-function",
                "missing-documentation",
                "bare-exception-handler",
                "magic-number",
                "long-line",
            ]
        );
    }

    #[test]
    fn test_text_issues_interleave_by_line() {
        let runner = Runner::empty()
            .with(EveryLine(IssueKind::MagicNumber, DetectorScope::Text))
            .with(EveryLine(IssueKind::LongLine, DetectorScope::Text))
            .with(EveryLine(IssueKind::MissingDocumentation, DetectorScope::Tree));

        let issues = runner.run(&empty_tree(), "a\nb\n");
        let order: Vec<_> = issues.iter().map(|i| (i.kind, i.line)).collect();
        assert_eq!(
            order,
            vec![
                (IssueKind::MissingDocumentation, Some(1)),
                (IssueKind::MissingDocumentation, Some(2)),
                (IssueKind::MagicNumber, Some(1)),
                (IssueKind::LongLine, Some(1)),
                (IssueKind::MagicNumber, Some(2)),
                (IssueKind::LongLine, Some(2)),
            ]
        );
    }

    #[test]
    fn test_empty_runner_finds_nothing() {
        let issues = Runner::empty().run(&empty_tree(), "x = 1000\n");
        assert!(issues.is_empty());
    }
}
