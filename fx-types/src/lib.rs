//! # FX Types
//!
//! Domain types and port traits for the currency-rate gateway.
//! This crate has ZERO IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Rate snapshots, historical series, paging, exclusion policy
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Query parameters for the API boundary
//! - `error/` - Domain, transport and gateway error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CurrencyCode, DateSeries, ExclusionPolicy, HistoricalSeries, PageSpec, PagedResult,
    RateSnapshot, RateTable, paginate,
};
pub use dto::*;
pub use error::{DomainError, GatewayError, GatewayResult};
pub use ports::{Clock, SystemClock, TransportError, UpstreamOutcome, UpstreamResponse, UpstreamTransport};
