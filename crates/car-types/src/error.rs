// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all CAR kernel failures.
///
/// Every variant is a local, recoverable setup or malformed-input error.
/// Low scores, unresolved tension and boundary topics are data, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Schema or generation request names a concept that was never registered.
    #[error("unknown concept: {0}")]
    UnknownConcept(String),

    /// Concept identifier already registered under another domain.
    #[error("duplicate concept '{id}': registered in domain '{existing}', attempted '{attempted}'")]
    DuplicateConcept {
        id: String,
        existing: String,
        attempted: String,
    },

    /// No generation rule produced a candidate for the concept.
    #[error("no generation rule produced output for concept '{0}'")]
    NoGenerationRule(String),

    /// Action is missing a description or recipients.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Orchestrator was configured for a domain the catalog does not know.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type KernelResult<T> = Result<T, KernelError>;
