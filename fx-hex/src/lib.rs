//! # FX Hex
//!
//! Application service, cache and adapters for the currency-rate gateway.
//!
//! ## Architecture
//!
//! - `service/` - `CurrencyGateway` (cache-or-fetch orchestration)
//! - `cache/` - `RateCache`, shared process-wide
//! - `expiry/` - `ExpiryScheduler` (publication-aligned expiry)
//! - `outbound/` - Provider HTTP client and the retry layer
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The gateway is generic over `T: UpstreamTransport`, allowing
//! different provider clients to be injected.

pub mod cache;
pub mod expiry;
pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;


pub use cache::{CachedRates, RateCache};
pub use expiry::ExpiryScheduler;
pub use outbound::{ReqwestTransport, RetryingFetcher};
pub use service::{CurrencyGateway, DEFAULT_UPSTREAM_URL};
