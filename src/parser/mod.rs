//! Language-agnostic parsing interface.
//!
//! This module provides:
//! - `TreeBuilder` trait: turns raw source text into a [`SyntaxTree`]
//! - `Language`: the grammars a builder can be selected by
//! - Tree-sitter implementations for the supported languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod tree;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

pub use tree::{BoolOperator, LineSpan, NodeKind, SyntaxNode, SyntaxTree, Walk};

/// Source languages with a registered grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
        }
    }

    /// File extensions (without dot) handled by this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyi"],
        }
    }

    /// Resolve a language from a file extension (with or without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        [Language::Python]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            _ => Err(format!("unsupported language: {}", s)),
        }
    }
}

/// Malformed input, or a grammar that could not produce a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
    /// 1-based line of the first offending construct, when known.
    pub line: Option<usize>,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
        }
    }
}

/// Builds a [`SyntaxTree`] from source text for one grammar.
///
/// Implementations must be pure: the same text always yields the same
/// tree or the same failure.
pub trait TreeBuilder: Send + Sync {
    /// The grammar this builder parses.
    fn language(&self) -> Language;

    /// Parse `text`, rejecting malformed or truncated input.
    fn build(&self, text: &str) -> Result<SyntaxTree, ParseFailure>;
}

/// Create the default builder for `language`.
///
/// Returns None when the grammar is not compiled in.
#[cfg(feature = "tree-sitter")]
pub fn builder_for(language: Language) -> Option<Box<dyn TreeBuilder>> {
    languages::new_builder(language)
}

/// Create the default builder (none without tree-sitter).
#[cfg(not(feature = "tree-sitter"))]
pub fn builder_for(_language: Language) -> Option<Box<dyn TreeBuilder>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockBuilder;

    impl TreeBuilder for MockBuilder {
        fn language(&self) -> Language {
            Language::Python
        }

        fn build(&self, text: &str) -> Result<SyntaxTree, ParseFailure> {
            if text.contains('(') && !text.contains(')') {
                return Err(ParseFailure::at_line("unbalanced parenthesis", 1));
            }
            Ok(SyntaxTree::new(SyntaxNode::new(
                NodeKind::Module,
                "module",
                LineSpan::new(1, 1),
            )))
        }
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("PY".parse::<Language>(), Ok(Language::Python));
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension(".py"), Some(Language::Python));
        assert_eq!(Language::from_extension("pyi"), Some(Language::Python));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_builder_trait_object() {
        let builder: Box<dyn TreeBuilder> = Box::new(MockBuilder);
        assert_eq!(builder.language(), Language::Python);
        assert!(builder.build("x = 1").is_ok());

        let err = builder.build("f(").unwrap_err();
        assert_eq!(err.line, Some(1));
        assert_eq!(err.to_string(), "unbalanced parenthesis");
    }
}
