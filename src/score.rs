//! Maintainability scoring.
//!
//! `maintainability = clamp(100 - 2*complexity - min(lines/10, 20) - 5*issues, 0, 100)`
//!
//! The score is total and non-increasing in each input.

use serde::{Deserialize, Serialize};

/// Penalty weights.
pub mod weights {
    pub const BASE_SCORE: f64 = 100.0;
    pub const PER_COMPLEXITY: f64 = 2.0;
    pub const LINES_PER_POINT: f64 = 10.0;
    pub const MAX_SIZE_PENALTY: f64 = 20.0;
    pub const PER_ISSUE: f64 = 5.0;
}

/// Assessment band thresholds (strictly greater than).
pub mod bands {
    pub const EXCELLENT_ABOVE: f64 = 80.0;
    pub const GOOD_ABOVE: f64 = 60.0;
    pub const FAIR_ABOVE: f64 = 40.0;
}

/// Maintainability index in `[0, 100]`.
pub fn maintainability_index(complexity: usize, line_count: usize, issue_count: usize) -> f64 {
    let complexity_penalty = complexity as f64 * weights::PER_COMPLEXITY;
    let size_penalty = (line_count as f64 / weights::LINES_PER_POINT).min(weights::MAX_SIZE_PENALTY);
    let issue_penalty = issue_count as f64 * weights::PER_ISSUE;

    (weights::BASE_SCORE - complexity_penalty - size_penalty - issue_penalty).clamp(0.0, 100.0)
}

/// Overall assessment band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assessment {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Assessment {
    /// Classify a maintainability index. A value exactly on a band
    /// boundary falls into the lower band.
    pub fn from_index(index: f64) -> Self {
        if index > bands::EXCELLENT_ABOVE {
            Assessment::Excellent
        } else if index > bands::GOOD_ABOVE {
            Assessment::Good
        } else if index > bands::FAIR_ABOVE {
            Assessment::Fair
        } else {
            Assessment::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Excellent => "excellent",
            Assessment::Good => "good",
            Assessment::Fair => "fair",
            Assessment::Poor => "poor",
        }
    }

    /// Upper-case band name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Assessment::Excellent => "EXCELLENT",
            Assessment::Good => "GOOD",
            Assessment::Fair => "FAIR",
            Assessment::Poor => "POOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Assessment::Excellent => "Code is highly maintainable",
            Assessment::Good => "Code is maintainable with minor improvements needed",
            Assessment::Fair => "Code requires significant refactoring",
            Assessment::Poor => "Major refactoring required",
        }
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.label(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula() {
        // 100 - 2 - 0.2 - 5
        assert!((maintainability_index(1, 2, 1) - 92.8).abs() < 1e-9);
        assert_eq!(maintainability_index(1, 0, 0), 98.0);
    }

    #[test]
    fn test_size_penalty_caps_at_twenty() {
        assert_eq!(maintainability_index(1, 200, 0), 78.0);
        assert_eq!(maintainability_index(1, 10_000, 0), 78.0);
    }

    #[test]
    fn test_clamped_to_range() {
        assert_eq!(maintainability_index(100, 1000, 100), 0.0);
        assert_eq!(maintainability_index(0, 0, 0), 100.0);
    }

    #[test]
    fn test_monotonic_in_each_input() {
        for n in 0..60 {
            assert!(maintainability_index(n + 1, 30, 2) <= maintainability_index(n, 30, 2));
            assert!(maintainability_index(3, n * 7 + 7, 2) <= maintainability_index(3, n * 7, 2));
            assert!(maintainability_index(3, 30, n + 1) <= maintainability_index(3, 30, n));
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Assessment::from_index(100.0), Assessment::Excellent);
        assert_eq!(Assessment::from_index(80.1), Assessment::Excellent);
        assert_eq!(Assessment::from_index(80.0), Assessment::Good);
        assert_eq!(Assessment::from_index(60.0), Assessment::Fair);
        assert_eq!(Assessment::from_index(40.0), Assessment::Poor);
        assert_eq!(Assessment::from_index(0.0), Assessment::Poor);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Assessment::Good.to_string(),
            "GOOD - Code is maintainable with minor improvements needed"
        );
    }
}
