//! Output formatting for analysis results.
//!
//! Supports three output formats:
//! - Text: the stable, plain multi-section report
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::Issue;
use crate::engine::AnalysisResult;
use crate::score::Assessment;

const HEADER: &str = "CODE ANALYSIS REPORT";
const RULE_WIDTH: usize = 50;

// =============================================================================
// Text Format
// =============================================================================

/// Render the plain text report.
///
/// Sections are emitted in a fixed order; the issue and security sections
/// appear only when non-empty.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut lines = vec![
        HEADER.to_string(),
        "=".repeat(RULE_WIDTH),
        format!("Lines of Code: {}", result.line_count),
        format!("Function Count: {}", result.definition_count),
        format!("Cyclomatic Complexity: {}", result.complexity),
        format!(
            "Maintainability Index: {:.1}/100",
            result.maintainability_index
        ),
        format!("Issues Found: {}", result.issue_count()),
    ];

    if !result.issues.is_empty() {
        lines.push("\nISSUES:".to_string());
        lines.extend(result.issues.iter().map(|i| format!("  - {}", i.message)));
    }

    if !result.security_findings.is_empty() {
        lines.push("\nSECURITY CONCERNS:".to_string());
        lines.extend(
            result
                .security_findings
                .iter()
                .map(|f| format!("  ! {}", f.message)),
        );
    }

    lines.push(format!("\nOVERALL ASSESSMENT: {}", result.assessment()));
    lines.join("\n")
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report covering one or more analyzed files.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub files: Vec<JsonFileReport>,
}

/// Per-file entry of the JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonFileReport {
    pub path: String,
    pub assessment: Assessment,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl JsonReport {
    pub fn new<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a AnalysisResult)>,
    {
        let files = results
            .into_iter()
            .map(|(path, result)| JsonFileReport {
                path: path.to_string(),
                assessment: result.assessment(),
                result: result.clone(),
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            files,
        }
    }
}

/// Render results as pretty-printed JSON.
pub fn render_json<'a, I>(results: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a AnalysisResult)>,
{
    Ok(serde_json::to_string_pretty(&JsonReport::new(results))?)
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write one result in pretty (human-readable, colored) format.
pub fn write_pretty(path: &str, result: &AnalysisResult) {
    println!();
    print!("  ");
    print!("{}", "codeprobe".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "File: ".dimmed());
    println!("{}", path.blue());
    println!();

    println!("    {:<24}{}", "Lines of code", result.line_count);
    println!("    {:<24}{}", "Functions", result.definition_count);
    println!("    {:<24}{}", "Cyclomatic complexity", result.complexity);
    print!("    {:<24}", "Maintainability");
    write_colored_index(result.maintainability_index, result.assessment());
    println!();
    println!();

    if !result.issues.is_empty() {
        write_issues(&result.issues);
        println!();
    }

    if !result.security_findings.is_empty() {
        println!(
            "  {} ({}):",
            "Security concerns".bold(),
            result.security_findings.len()
        );
        for finding in &result.security_findings {
            print!("    {} ", "SECURITY".red());
            print!("{:<22}", finding.signature.dimmed());
            println!("{}", finding.label());
        }
        println!();
    }

    write_assessment(result.assessment());
    println!();
}

fn write_colored_index(index: f64, assessment: Assessment) {
    let text = format!("{:.1}/100", index);
    match assessment {
        Assessment::Excellent => print!("{}", text.green().bold()),
        Assessment::Good => print!("{}", text.green()),
        Assessment::Fair => print!("{}", text.yellow()),
        Assessment::Poor => print!("{}", text.red()),
    }
}

fn write_issues(issues: &[Issue]) {
    println!("  {} ({}):", "Issues".bold(), issues.len());
    println!();

    for issue in issues {
        print!("    {:<24}", issue.kind.as_str().dimmed());
        if let Some(line) = issue.line {
            print!("{}", format!("line {:<6}", line).dimmed());
        } else {
            print!("{:<11}", "");
        }
        println!("{}", issue.message);
    }
}

fn write_assessment(assessment: Assessment) {
    let label = match assessment {
        Assessment::Excellent => assessment.label().green().bold(),
        Assessment::Good => assessment.label().green(),
        Assessment::Fair => assessment.label().yellow(),
        Assessment::Poor => assessment.label().red().bold(),
    };
    println!("  {} {}", label, assessment.description().dimmed());
}
