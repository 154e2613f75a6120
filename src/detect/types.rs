//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// Kinds of structural and textual issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "oversized-function")]
    OversizedFunction,
    #[serde(rename = "missing-documentation")]
    MissingDocumentation,
    #[serde(rename = "bare-exception-handler")]
    BareExceptionHandler,
    #[serde(rename = "magic-number")]
    MagicNumber,
    #[serde(rename = "long-line")]
    LongLine,
    #[serde(rename = "parse-error")]
    ParseError,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::OversizedFunction => "oversized-function",
            IssueKind::MissingDocumentation => "missing-documentation",
            IssueKind::BareExceptionHandler => "bare-exception-handler",
            IssueKind::MagicNumber => "magic-number",
            IssueKind::LongLine => "long-line",
            IssueKind::ParseError => "parse-error",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single structural or textual finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
    /// 1-based line, when the issue has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(kind: IssueKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line: Some(line),
        }
    }
}

/// A risky-construct signature matched in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFinding {
    /// Signature identifier, e.g. `eval_usage`.
    pub signature: String,
    pub message: String,
}

impl SecurityFinding {
    /// Create a finding whose message is derived from the signature id.
    pub fn for_signature(signature: &str) -> Self {
        Self {
            signature: signature.to_string(),
            message: format!("Potential security concern: {}", signature_label(signature)),
        }
    }

    /// Human-readable label of the signature.
    pub fn label(&self) -> String {
        signature_label(&self.signature)
    }
}

/// `hardcoded_passwords` -> `hardcoded passwords`.
pub fn signature_label(signature: &str) -> String {
    signature.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_names_match_serde() {
        for kind in [
            IssueKind::OversizedFunction,
            IssueKind::MissingDocumentation,
            IssueKind::BareExceptionHandler,
            IssueKind::MagicNumber,
            IssueKind::LongLine,
            IssueKind::ParseError,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_issue_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&IssueKind::BareExceptionHandler).unwrap();
        assert_eq!(json, "\"bare-exception-handler\"");
    }

    #[test]
    fn test_security_finding_message() {
        let finding = SecurityFinding::for_signature("sql_string_concat");
        assert_eq!(finding.label(), "sql string concat");
        assert_eq!(
            finding.message,
            "Potential security concern: sql string concat"
        );
    }
}
