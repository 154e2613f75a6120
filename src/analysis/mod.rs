//! Tree-backed source metrics.
//!
//! The metric collector walks a [`SyntaxTree`](crate::parser::SyntaxTree)
//! and derives:
//! - Line count of the raw text
//! - Function definition count and per-definition size
//! - Cyclomatic complexity (additive decision-point heuristic)

mod metrics;

pub use metrics::{
    count_lines, cyclomatic_complexity, definition_count, definition_sizes, DefinitionSize, Metrics,
    BASE_COMPLEXITY,
};
