//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.
//! Clients are identified by their socket peer address; `X-Forwarded-For`
//! is only consulted when the peer is a configured proxy.

use std::{
    collections::HashSet,
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;

/// Bucket shared by requests that carry no peer address.
const UNKNOWN_CLIENT: &str = "anonymous";

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
    /// Peers whose `X-Forwarded-For` header is believed
    trusted_proxies: HashSet<IpAddr>,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::per_minute(100)
    }
}

impl RateLimiterState {
    pub fn new(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
            trusted_proxies: HashSet::new(),
        }
    }

    /// Allows a burst of `requests`, refilled over one minute.
    /// A zero quota is raised to one request per minute.
    pub fn per_minute(requests: u32) -> Self {
        let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self::new(Quota::per_minute(requests))
    }

    /// Peers allowed to name the real client through `X-Forwarded-For`.
    pub fn with_trusted_proxies(mut self, proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        self.trusted_proxies = proxies.into_iter().collect();
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Number of clients with live bucket state.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drops buckets that have fully refilled, returning how many remain.
    pub fn purge_stale(&self) -> usize {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        self.limiter.len()
    }

    /// Identifies the caller.
    ///
    /// An untrusted peer is keyed by its own IP. Behind a trusted proxy the
    /// forwarded chain is walked right to left and the first hop that is
    /// not one of our proxies wins.
    pub fn client_key(&self, request: &Request<Body>) -> String {
        let Some(peer) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
        else {
            return UNKNOWN_CLIENT.to_string();
        };

        if !self.trusted_proxies.contains(&peer) {
            return peer.to_string();
        }

        request
            .headers()
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default()
            .rsplit(',')
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .find(|hop| match hop.parse::<IpAddr>() {
                Ok(ip) => !self.trusted_proxies.contains(&ip),
                Err(_) => true,
            })
            .map(str::to_string)
            .unwrap_or_else(|| peer.to_string())
    }
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = limiter.client_key(&request);
    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "code": 429,
                "retryAfterSeconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
