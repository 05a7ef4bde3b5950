//! Port traits (interfaces for adapters).
//!
//! The gateway depends on these traits, not on concrete HTTP clients or
//! the system clock.

mod clock;
mod upstream;

pub use clock::{Clock, SystemClock};
pub use upstream::{TransportError, UpstreamOutcome, UpstreamResponse, UpstreamTransport};
