//! Security signature scanning over raw source text.
//!
//! Each signature is a case-insensitive regex applied to the whole text.
//! A signature that matches anywhere produces exactly one finding.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use super::SecurityFinding;

/// Built-in signature identifiers.
pub mod signatures {
    pub const EVAL_USAGE: &str = "eval_usage";
    pub const EXEC_USAGE: &str = "exec_usage";
    pub const SHELL_TRUE: &str = "shell_true";
    pub const SQL_STRING_CONCAT: &str = "sql_string_concat";
    pub const HARDCODED_PASSWORDS: &str = "hardcoded_passwords";
}

/// Built-in catalogue as (id, pattern) pairs, in scan order.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    (signatures::EVAL_USAGE, r"eval\s*\("),
    (signatures::EXEC_USAGE, r"exec\s*\("),
    (signatures::SHELL_TRUE, r"shell\s*=\s*True"),
    (signatures::SQL_STRING_CONCAT, r"SELECT.*\+"),
    (
        signatures::HARDCODED_PASSWORDS,
        r#"(password|passwd|secret|api_?key|token)\w*\s*=\s*['"][^'"]+['"]"#,
    ),
];

lazy_static! {
    static ref BUILTIN: Vec<Signature> = BUILTIN_PATTERNS
        .iter()
        .map(|(id, pattern)| Signature::new(id, pattern).unwrap())
        .collect();
}

/// A named risky-construct pattern.
#[derive(Debug, Clone)]
pub struct Signature {
    id: String,
    regex: Regex,
}

impl Signature {
    /// Compile a case-insensitive signature.
    pub fn new(id: &str, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            id: id.to_string(),
            regex,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Ordered set of signatures applied by the scanner.
#[derive(Debug, Clone)]
pub struct SignatureCatalogue {
    signatures: Vec<Signature>,
}

impl SignatureCatalogue {
    /// A catalogue with no signatures.
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
        }
    }

    /// Append a signature; it is scanned after the existing ones.
    pub fn push(&mut self, signature: Signature) {
        self.signatures.push(signature);
    }

    pub fn ids(&self) -> Vec<&str> {
        self.signatures.iter().map(|s| s.id()).collect()
    }

    /// One finding per matching signature, in catalogue order.
    pub fn scan(&self, text: &str) -> Vec<SecurityFinding> {
        self.signatures
            .iter()
            .filter(|s| s.matches(text))
            .map(|s| SecurityFinding::for_signature(s.id()))
            .collect()
    }
}

impl Default for SignatureCatalogue {
    fn default() -> Self {
        Self {
            signatures: BUILTIN.clone(),
        }
    }
}

/// Scan `text` with the built-in catalogue.
pub fn scan_security(text: &str) -> Vec<SecurityFinding> {
    SignatureCatalogue::default().scan(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(text: &str) -> Vec<String> {
        scan_security(text)
            .into_iter()
            .map(|f| f.signature)
            .collect()
    }

    #[test]
    fn test_clean_text_has_no_findings() {
        assert!(ids("def add(a, b):\n    return a + b\n").is_empty());
    }

    #[test]
    fn test_one_finding_per_signature() {
        let text = "eval(a)\neval(b)\nEVAL (c)\n";
        let findings = scan_security(text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].signature, signatures::EVAL_USAGE);
        assert_eq!(findings[0].message, "Potential security concern: eval usage");
    }

    #[test]
    fn test_catalogue_order() {
        let text = r#"
password = "hunter2"
query = "select * from users where id = " + user_id
subprocess.run(cmd, shell=True)
exec(code)
eval(expr)
"#;
        assert_eq!(
            ids(text),
            vec![
                signatures::EVAL_USAGE,
                signatures::EXEC_USAGE,
                signatures::SHELL_TRUE,
                signatures::SQL_STRING_CONCAT,
                signatures::HARDCODED_PASSWORDS,
            ]
        );
    }

    #[test]
    fn test_hardcoded_credentials() {
        assert_eq!(ids(r#"password = "abc123""#), vec![signatures::HARDCODED_PASSWORDS]);
        assert_eq!(ids("API_KEY='sk-live-1'"), vec![signatures::HARDCODED_PASSWORDS]);
        assert!(ids("password = get_password()").is_empty());
        assert!(ids(r#"if password == "x": pass"#).is_empty());
    }

    #[test]
    fn test_custom_signature() {
        let mut catalogue = SignatureCatalogue::empty();
        catalogue.push(Signature::new("pickle_load", r"pickle\.loads?\(").unwrap());
        let findings = catalogue.scan("data = pickle.loads(blob)");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Potential security concern: pickle load");
    }
}
