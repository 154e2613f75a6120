//! Analyzer configuration.
//!
//! Thresholds are validated once, when the configuration is built, and are
//! read-only afterwards. A YAML file can override the defaults and add
//! extra security signatures.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detect::{Signature, SignatureCatalogue};

/// Default maximum function span (`end - start`) before it is flagged.
pub const DEFAULT_MAX_FUNCTION_LINES: usize = 50;

/// Default line length (in characters) at which a line is flagged.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// Config file names searched for in a directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codeprobe.yaml", ".codeprobe.yaml"];

/// Starting point written by `codeprobe init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# codeprobe configuration
version: "1"

# Functions spanning more lines than this are reported as oversized.
max_function_lines: 50

# Lines with at least this many characters are reported as too long.
max_line_length: 100

# Extra case-insensitive security signatures, scanned after the built-in ones.
security_signatures: []
#  - id: pickle_load
#    pattern: 'pickle\.loads?\('
"#;

/// Errors raised while building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be {requirement}, got {value}")]
    InvalidLimit {
        name: &'static str,
        requirement: &'static str,
        value: i64,
    },
    #[error("invalid security signature {id:?}: {source}")]
    InvalidSignature {
        id: String,
        #[source]
        source: regex::Error,
    },
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Validated analyzer thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerConfig {
    max_function_lines: usize,
    max_line_length: usize,
}

impl AnalyzerConfig {
    /// Build a configuration, rejecting negative limits and a zero line length.
    pub fn new(max_function_lines: i64, max_line_length: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            max_function_lines: limit("max_function_lines", max_function_lines, 0)?,
            max_line_length: limit("max_line_length", max_line_length, 1)?,
        })
    }

    pub fn max_function_lines(&self) -> usize {
        self.max_function_lines
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_function_lines: DEFAULT_MAX_FUNCTION_LINES,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

fn limit(name: &'static str, value: i64, min: i64) -> Result<usize, ConfigError> {
    if value < min {
        return Err(ConfigError::InvalidLimit {
            name,
            requirement: if min == 0 {
                "non-negative"
            } else {
                "positive"
            },
            value,
        });
    }
    usize::try_from(value).map_err(|_| ConfigError::InvalidLimit {
        name,
        requirement: "addressable",
        value,
    })
}

/// A user-supplied security signature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureSpec {
    pub id: String,
    pub pattern: String,
}

/// On-disk configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub max_function_lines: Option<i64>,
    #[serde(default)]
    pub max_line_length: Option<i64>,
    #[serde(default)]
    pub security_signatures: Vec<SignatureSpec>,
}

impl ConfigFile {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse a configuration from YAML text.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Thresholds from this file, falling back to the defaults.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        AnalyzerConfig::new(
            self.max_function_lines
                .unwrap_or(DEFAULT_MAX_FUNCTION_LINES as i64),
            self.max_line_length
                .unwrap_or(DEFAULT_MAX_LINE_LENGTH as i64),
        )
    }

    /// Built-in signatures followed by the ones declared in this file.
    pub fn signature_catalogue(&self) -> Result<SignatureCatalogue, ConfigError> {
        let mut catalogue = SignatureCatalogue::default();
        for spec in &self.security_signatures {
            let signature = Signature::new(&spec.id, &spec.pattern).map_err(|source| {
                ConfigError::InvalidSignature {
                    id: spec.id.clone(),
                    source,
                }
            })?;
            catalogue.push(signature);
        }
        Ok(catalogue)
    }
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
