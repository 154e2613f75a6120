//! Line-based textual smells.

use lazy_static::lazy_static;
use regex::Regex;

use crate::parser::SyntaxTree;

use super::{Detector, DetectorScope, Issue, IssueKind};

lazy_static! {
    /// Integer tokens of three or more digits.
    static ref MAGIC_NUMBER: Regex = Regex::new(r"\b\d{3,}\b").unwrap();
}

/// Lines carrying this marker are treated as explained and skipped.
const COMMENT_MARKER: char = '#';

/// Flags lines holding an unexplained integer literal of three or more digits.
///
/// One issue per line, however many numbers it holds.
#[derive(Debug, Clone, Default)]
pub struct MagicNumberDetector;

impl Detector for MagicNumberDetector {
    fn id(&self) -> &'static str {
        IssueKind::MagicNumber.as_str()
    }

    fn scope(&self) -> DetectorScope {
        DetectorScope::Text
    }

    fn detect(&self, _tree: &SyntaxTree, text: &str) -> Vec<Issue> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| MAGIC_NUMBER.is_match(line) && !line.contains(COMMENT_MARKER))
            .map(|(idx, _)| {
                let line_number = idx + 1;
                Issue::at_line(
                    IssueKind::MagicNumber,
                    format!("Potential magic number in line {}", line_number),
                    line_number,
                )
            })
            .collect()
    }
}

/// Flags lines of at least `max_chars` characters.
#[derive(Debug, Clone)]
pub struct LongLineDetector {
    max_chars: usize,
}

impl LongLineDetector {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Detector for LongLineDetector {
    fn id(&self) -> &'static str {
        IssueKind::LongLine.as_str()
    }

    fn scope(&self) -> DetectorScope {
        DetectorScope::Text
    }

    fn detect(&self, _tree: &SyntaxTree, text: &str) -> Vec<Issue> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| line.chars().count() >= self.max_chars)
            .map(|(idx, _)| {
                let line_number = idx + 1;
                Issue::at_line(
                    IssueKind::LongLine,
                    format!("Line {} is too long", line_number),
                    line_number,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{LineSpan, NodeKind, SyntaxNode};

    fn tree() -> SyntaxTree {
        SyntaxTree::new(SyntaxNode::new(
            NodeKind::Module,
            "module",
            LineSpan::new(1, 1),
        ))
    }

    #[test]
    fn test_magic_numbers() {
        let text = "timeout = 3000\nretries = 3\nport = 8080  # http-alt\nx = 1000 + 2000\nname = 'v1234'\n";
        let lines: Vec<_> = MagicNumberDetector
            .detect(&tree(), text)
            .into_iter()
            .map(|i| i.line)
            .collect();
        assert_eq!(lines, vec![Some(1), Some(4)]);
    }

    #[test]
    fn test_magic_number_message() {
        let issues = MagicNumberDetector.detect(&tree(), "\n\nlimit = 500\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Potential magic number in line 3");
    }

    #[test]
    fn test_long_line_boundary() {
        let text = format!("{}\n{}\n", "a".repeat(99), "b".repeat(100));
        let issues = LongLineDetector::new(100).detect(&tree(), &text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(2));
        assert_eq!(issues[0].message, "Line 2 is too long");
    }

    #[test]
    fn test_long_line_counts_characters() {
        let text = "é".repeat(60);
        assert!(LongLineDetector::new(100).detect(&tree(), &text).is_empty());
    }
}
