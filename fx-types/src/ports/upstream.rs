//! Upstream rate provider port.
//!
//! Implementations perform a single HTTP GET; retrying is layered on top.

/// Error type for a failed request that produced no HTTP response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// A raw response from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`
    pub reason: String,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_outcome(self) -> UpstreamOutcome {
        match self.status {
            200..=299 => UpstreamOutcome::Success(self.body),
            400..=499 => UpstreamOutcome::ClientError {
                status: self.status,
                reason: self.reason,
            },
            _ => UpstreamOutcome::ServerError {
                status: self.status,
                reason: self.reason,
            },
        }
    }
}

/// Final result of talking to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success(String),
    ClientError { status: u16, reason: String },
    ServerError { status: u16, reason: String },
    TransportFault(String),
}

/// Port trait for the HTTP client that reaches the provider.
#[async_trait::async_trait]
pub trait UpstreamTransport: Send + Sync + 'static {
    /// Issues one GET against `url`.
    async fn get(&self, url: &str) -> Result<UpstreamResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert_eq!(
            UpstreamResponse::new(200, "OK", "{}").into_outcome(),
            UpstreamOutcome::Success("{}".into())
        );
        assert!(matches!(
            UpstreamResponse::new(404, "Not Found", "").into_outcome(),
            UpstreamOutcome::ClientError { status: 404, .. }
        ));
        assert!(matches!(
            UpstreamResponse::new(503, "Service Unavailable", "").into_outcome(),
            UpstreamOutcome::ServerError { status: 503, .. }
        ));
    }
}
