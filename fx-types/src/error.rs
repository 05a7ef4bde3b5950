//! Error types for the rate gateway.

use crate::domain::CurrencyCode;

/// Domain-level errors (request validation).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid page request: page {page} and page size {page_size} must both be at least 1")]
    InvalidPage { page: u32, page_size: u32 },
}

/// Gateway-level errors.
///
/// Every variant maps to an HTTP status through [`GatewayError::status_code`];
/// the `Display` text is the message handed back to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// Conversion touching a denied currency. Never reaches cache or network.
    #[error("Currency conversion for the {from} to {to} currency is not allowed.")]
    ExcludedPair { from: CurrencyCode, to: CurrencyCode },

    #[error("{0}")]
    BadRequest(String),

    /// Provider answered with a non-success status after all attempts.
    #[error("{reason}")]
    Upstream { status: u16, reason: String },

    /// Network failure or unreadable payload. The detail is for logs only.
    #[error("Internal Server Error")]
    Transport(String),
}

impl GatewayError {
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::ExcludedPair { .. } | GatewayError::BadRequest(_) => 400,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Transport(_) => 500,
        }
    }
}

impl From<DomainError> for GatewayError {
    fn from(err: DomainError) -> Self {
        GatewayError::BadRequest(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
