//! Detection module for quality issues and security signatures.

mod runner;
mod security;
mod structure;
mod text;
mod types;

pub use runner::{Detector, DetectorScope, Runner};
pub use security::{scan_security, signatures, Signature, SignatureCatalogue};
pub use structure::{
    BareExceptDetector, MissingDocsDetector, OversizedFunctionDetector,
    MODULE_DOC_MIN_STATEMENTS,
};
pub use text::{LongLineDetector, MagicNumberDetector};
pub use types::{signature_label, Issue, IssueKind, SecurityFinding};
