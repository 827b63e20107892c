//! Portal error taxonomy.
//!
//! Every failure class the portal can surface to a caller. Nothing here is
//! fatal to a session: store problems degrade to defaults or backups,
//! malformed snapshots are treated as empty, and rejected transitions leave
//! state untouched.

use thiserror::Error;

/// Errors surfaced by portal operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// A transition was attempted with empty text or a missing translator
    /// identity. The transition is aborted and no state is mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The acting user lacks rights to edit this unit. The transition is
    /// refused and no state is mutated.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// An unknown or disabled language code was supplied.
    #[error("invalid language code: '{0}'")]
    InvalidLanguage(String),

    /// The record store could not be reached or written. Loads degrade to
    /// empty defaults; saves fall back to the local backup.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A snapshot was not valid JSON or did not have the expected shape.
    /// Callers treat the snapshot as empty rather than propagating this.
    #[error("malformed snapshot: {0}")]
    MalformedInput(String),
}

impl PortalError {
    /// Short machine-readable tag for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PortalError::Validation(_) => "validation",
            PortalError::Authorization(_) => "authorization",
            PortalError::InvalidLanguage(_) => "invalid_language",
            PortalError::StoreUnavailable(_) => "store_unavailable",
            PortalError::MalformedInput(_) => "malformed_input",
        }
    }
}
