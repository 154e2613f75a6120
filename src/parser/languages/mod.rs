//! Language-specific tree-sitter configurations.
//!
//! Each language module provides:
//! - A node classifier for the grammar's node types
//! - A docstring extractor
//! - Factory function for creating builders

pub mod python;

use super::{Language, TreeBuilder};

/// Create the builder registered for `language`.
pub fn new_builder(language: Language) -> Option<Box<dyn TreeBuilder>> {
    match language {
        Language::Python => Some(python::new_builder()),
    }
}
