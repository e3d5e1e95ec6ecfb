//! Error types for the provisioning service.

use chrono::{DateTime, Utc};

/// Domain-level errors (invalid values, broken invariants).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid address prefix: {0}")]
    InvalidAddressPrefix(String),

    #[error(
        "Net balance {net} does not equal clearing balance {clearing} plus prepaid amount {prepaid}"
    )]
    InvalidBalance {
        net: String,
        clearing: String,
        prepaid: u64,
    },

    #[error("Custom setting missing: {0}")]
    MissingSetting(String),
}

/// Errors returned by the connector admin ports.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Connector rejected request: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connector unreachable: {0}")]
    Transport(String),

    #[error("Invalid connector response: {0}")]
    Decode(String),
}

/// Bearer token decoding outcomes other than success.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// A structured token whose `exp` has passed. Never treated as opaque.
    #[error("JWT expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    /// Not a structured token; the caller may treat it as a SIMPLE secret.
    #[error("Not a decodable JWT: {0}")]
    Undecodable(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => AppError::BadRequest(msg),
            DomainError::InvalidAddressPrefix(_) => AppError::BadRequest(err.to_string()),
            DomainError::InvalidBalance { .. } => {
                AppError::Upstream(UpstreamError::Decode(err.to_string()))
            }
            DomainError::MissingSetting(_) => AppError::Internal(err.to_string()),
        }
    }
}
