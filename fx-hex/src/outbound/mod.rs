//! Outbound adapters: the provider's HTTP client and the retry layer over it.

mod fetcher;
mod http;

pub use fetcher::RetryingFetcher;
pub use http::ReqwestTransport;
