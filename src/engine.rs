//! Analysis engine: parse, measure, detect, score.
//!
//! ```text
//! SourceUnit ──▶ TreeBuilder ──▶ SyntaxTree ──┬──▶ Metrics ──┐
//!     │                                       └──▶ Runner  ──┼──▶ maintainability
//!     └──────────────▶ SignatureCatalogue ───────────────────┴──▶ AnalysisResult
//! ```
//!
//! An [`Analyzer`] holds only immutable configuration and registries, so one
//! instance can serve concurrent `analyze` calls.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{DefinitionSize, Metrics};
use crate::config::AnalyzerConfig;
use crate::detect::{
    Detector, Issue, IssueKind, Runner, SecurityFinding, Signature, SignatureCatalogue,
};
use crate::parser::{self, Language, ParseFailure, SyntaxTree, TreeBuilder};
use crate::report;
use crate::score::{maintainability_index, Assessment};

/// One source unit to analyze. Owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceUnit<'a> {
    pub text: &'a str,
    pub language: Language,
}

impl<'a> SourceUnit<'a> {
    pub fn new(text: &'a str, language: Language) -> Self {
        Self { text, language }
    }

    pub fn python(text: &'a str) -> Self {
        Self::new(text, Language::Python)
    }
}

/// Aggregate result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub language: Language,
    pub complexity: usize,
    pub line_count: usize,
    pub definition_count: usize,
    pub definitions: Vec<DefinitionSize>,
    pub issues: Vec<Issue>,
    pub security_findings: Vec<SecurityFinding>,
    pub maintainability_index: f64,
}

impl AnalysisResult {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::from_index(self.maintainability_index)
    }

    pub fn has_parse_error(&self) -> bool {
        self.issues.iter().any(|i| i.kind == IssueKind::ParseError)
    }

    /// Plain text report.
    pub fn render(&self) -> String {
        report::render_text(self)
    }
}

/// Static analyzer for single source units.
pub struct Analyzer {
    config: AnalyzerConfig,
    builders: Vec<Box<dyn TreeBuilder>>,
    runner: Runner,
    catalogue: SignatureCatalogue,
}

impl Analyzer {
    /// Create an analyzer with the built-in grammars, detectors and signatures.
    pub fn new(config: AnalyzerConfig) -> Self {
        let builders = [Language::Python]
            .into_iter()
            .filter_map(parser::builder_for)
            .collect();
        Self {
            runner: Runner::new(&config),
            config,
            builders,
            catalogue: SignatureCatalogue::default(),
        }
    }

    /// Use `builder` for its language, taking precedence over any existing one.
    pub fn with_builder(mut self, builder: Box<dyn TreeBuilder>) -> Self {
        self.builders.insert(0, builder);
        self
    }

    /// Register an extra issue detector after the built-in ones.
    pub fn with_detector<D: Detector + 'static>(mut self, detector: D) -> Self {
        self.runner = self.runner.with(detector);
        self
    }

    /// Append a security signature to the catalogue.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.catalogue.push(signature);
        self
    }

    /// Replace the security signature catalogue.
    pub fn with_catalogue(mut self, catalogue: SignatureCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one source unit.
    ///
    /// Never fails: malformed input yields a result holding a single
    /// parse-error issue with base metrics.
    pub fn analyze(&self, source: &SourceUnit<'_>) -> AnalysisResult {
        let security_findings = self.catalogue.scan(source.text);

        let (metrics, issues) = match self.build_tree(source) {
            Ok(tree) => {
                let metrics = Metrics::collect(&tree, source.text);
                let issues = self.runner.run(&tree, source.text);
                debug!(
                    language = %source.language,
                    lines = metrics.line_count,
                    definitions = metrics.definition_count,
                    complexity = metrics.complexity,
                    issues = issues.len(),
                    "analyzed source unit"
                );
                (metrics, issues)
            }
            Err(failure) => {
                warn!(language = %source.language, line = ?failure.line, "parse failed: {}", failure);
                (Metrics::default(), vec![parse_error_issue(&failure)])
            }
        };

        let maintainability =
            maintainability_index(metrics.complexity, metrics.line_count, issues.len());

        AnalysisResult {
            language: source.language,
            complexity: metrics.complexity,
            line_count: metrics.line_count,
            definition_count: metrics.definition_count,
            definitions: metrics.definitions,
            issues,
            security_findings,
            maintainability_index: maintainability,
        }
    }

    /// Analyze Python source text.
    pub fn analyze_python(&self, text: &str) -> AnalysisResult {
        self.analyze(&SourceUnit::python(text))
    }

    /// Analyze and render the plain text report.
    pub fn report(&self, source: &SourceUnit<'_>) -> String {
        self.analyze(source).render()
    }

    fn build_tree(&self, source: &SourceUnit<'_>) -> Result<SyntaxTree, ParseFailure> {
        let builder = self
            .builders
            .iter()
            .find(|b| b.language() == source.language)
            .ok_or_else(|| {
                ParseFailure::new(format!("no grammar available for {}", source.language))
            })?;
        builder.build(source.text)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

fn parse_error_issue(failure: &ParseFailure) -> Issue {
    match failure.line {
        Some(line) => Issue::at_line(
            IssueKind::ParseError,
            format!("Syntax error: {} (line {})", failure.message, line),
            line,
        ),
        None => Issue::new(
            IssueKind::ParseError,
            format!("Syntax error: {}", failure.message),
        ),
    }
}
