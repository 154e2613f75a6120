//! Codeprobe - static quality analysis for a single source unit.
//!
//! Codeprobe parses source text into a syntax tree, derives quality
//! metrics (line count, definition count, cyclomatic complexity), flags
//! structural and textual issues, scans for security-sensitive constructs
//! and combines everything into a bounded maintainability index and a
//! human-readable report.
//!
//! # Architecture
//!
//! - `parser`: `TreeBuilder` trait and tree-sitter grammars producing a `SyntaxTree`
//! - `analysis`: Metric collection over the tree
//! - `detect`: Issue detectors (tree and text) and the security signature catalogue
//! - `score`: Maintainability index and assessment bands
//! - `report`: Output formatting (text, pretty, JSON)
//! - `engine`: `Analyzer` wiring the pieces together
//! - `config`: Validated thresholds and the YAML config file
//!
//! # Example
//!
//! ```no_run
//! use codeprobe::{Analyzer, SourceUnit};
//!
//! let analyzer = Analyzer::default();
//! let result = analyzer.analyze(&SourceUnit::python("def f():\n    return 1\n"));
//! assert_eq!(result.definition_count, 1);
//! println!("{}", result.render());
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod parser;
pub mod report;
pub mod score;

pub use analysis::{DefinitionSize, Metrics};
pub use config::{AnalyzerConfig, ConfigError, ConfigFile};
pub use detect::{Detector, DetectorScope, Issue, IssueKind, SecurityFinding, Signature};
pub use engine::{AnalysisResult, Analyzer, SourceUnit};
pub use parser::{Language, ParseFailure, SyntaxTree, TreeBuilder};
pub use score::{maintainability_index, Assessment};
