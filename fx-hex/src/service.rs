//! Currency Gateway Service
//!
//! Serves latest rates, conversions and historical ranges from the cache,
//! falling back to the upstream provider on a miss.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use fx_types::{
    Clock, CurrencyCode, ExclusionPolicy, GatewayError, GatewayResult, HistoricalSeries, PageSpec,
    PagedResult, RateSnapshot, SystemClock, UpstreamOutcome, UpstreamTransport, paginate,
};

use crate::cache::{CachedRates, RateCache, keys};
use crate::expiry::ExpiryScheduler;
use crate::outbound::RetryingFetcher;

/// Provider used when no base URL is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.frankfurter.app";

/// Application service for rate lookups.
///
/// Generic over `T: UpstreamTransport` so tests can script the provider.
/// The cache is shared: clone the `Arc` to hand the same store to several
/// gateways or to a background sweeper.
pub struct CurrencyGateway<T: UpstreamTransport> {
    fetcher: RetryingFetcher<T>,
    cache: Arc<RateCache>,
    scheduler: ExpiryScheduler,
    policy: ExclusionPolicy,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl<T: UpstreamTransport> CurrencyGateway<T> {
    /// Creates a gateway with the default schedule, policy and system clock.
    pub fn new(fetcher: RetryingFetcher<T>, cache: Arc<RateCache>) -> Self {
        Self {
            fetcher,
            cache,
            scheduler: ExpiryScheduler::default(),
            policy: ExclusionPolicy::default(),
            clock: Arc::new(SystemClock),
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_scheduler(mut self, scheduler: ExpiryScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    pub fn fetcher(&self) -> &RetryingFetcher<T> {
        &self.fetcher
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Latest rates for `base`.
    #[tracing::instrument(skip_all, fields(base = %base))]
    pub async fn latest_rates(&self, base: CurrencyCode) -> GatewayResult<RateSnapshot> {
        let key = keys::latest(&base);
        if let Some(CachedRates::Snapshot(cached)) = self.cache.get(&key, self.clock.now()) {
            return Ok(cached);
        }

        let url = self.endpoint("latest", &[("from", base.to_string())])?;
        let snapshot: RateSnapshot = self.fetch_json(&url).await?;
        self.store(key, CachedRates::Snapshot(snapshot.clone()));
        Ok(snapshot)
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// Pairs touching a denied currency are rejected before the cache or the
    /// provider is consulted.
    #[tracing::instrument(skip_all, fields(from = %from, to = %to, amount = %amount))]
    pub async fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> GatewayResult<RateSnapshot> {
        if !self.policy.permits(&from, &to) {
            info!("Rejected conversion involving an excluded currency");
            return Err(GatewayError::ExcludedPair { from, to });
        }

        let amount = amount.normalize();
        let key = keys::convert(amount, &from, &to);
        if let Some(CachedRates::Snapshot(cached)) = self.cache.get(&key, self.clock.now()) {
            return Ok(cached);
        }

        let url = self.endpoint(
            "latest",
            &[
                ("amount", amount.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )?;
        let snapshot: RateSnapshot = self.fetch_json(&url).await?;
        self.store(key, CachedRates::Snapshot(snapshot.clone()));
        Ok(snapshot)
    }

    /// Rates for every business day in `start..=end`, unpaginated.
    #[tracing::instrument(skip_all, fields(base = %base, start = %start, end = %end))]
    pub async fn historical_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
    ) -> GatewayResult<HistoricalSeries> {
        let key = keys::historical(start, end, &base);
        if let Some(CachedRates::Series(cached)) = self.cache.get(&key, self.clock.now()) {
            return Ok(cached);
        }

        let range = format!("{}..{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        let url = self.endpoint(&range, &[("base", base.to_string())])?;
        let series: HistoricalSeries = self.fetch_json(&url).await?;
        self.store(key, CachedRates::Series(series.clone()));
        Ok(series)
    }

    /// One page of the historical series for `start..=end`.
    ///
    /// The whole series is cached; pages are sliced from it on every call.
    pub async fn historical_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
        page: u32,
        page_size: u32,
    ) -> GatewayResult<PagedResult> {
        let spec = PageSpec::new(page, page_size)?;
        let series = self.historical_series(start, end, base).await?;
        Ok(paginate(&series, spec))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    /// `{base_url}/{path}?{params}` with the query values percent-encoded.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> GatewayResult<String> {
        let raw = format!("{}/{}", self.base_url, path);
        reqwest::Url::parse_with_params(&raw, params)
            .map(String::from)
            .map_err(|e| {
                error!(url = %raw, error = %e, "Invalid upstream URL");
                GatewayError::Transport(format!("invalid upstream url: {e}"))
            })
    }

    async fn fetch_json<V: DeserializeOwned>(&self, url: &str) -> GatewayResult<V> {
        match self.fetcher.fetch(url).await {
            UpstreamOutcome::Success(body) => serde_json::from_str(&body).map_err(|e| {
                error!(url, error = %e, "Failed to parse upstream payload");
                GatewayError::Transport(format!("invalid payload: {e}"))
            }),
            UpstreamOutcome::ClientError { status, reason }
            | UpstreamOutcome::ServerError { status, reason } => {
                info!(url, status, %reason, "Upstream request failed");
                Err(GatewayError::Upstream { status, reason })
            }
            UpstreamOutcome::TransportFault(detail) => {
                error!(url, error = %detail, "Upstream unreachable");
                Err(GatewayError::Transport(detail))
            }
        }
    }

    fn store(&self, key: String, value: CachedRates) {
        let expires_at = self.scheduler.next_expiry(self.clock.now());
        debug!(key = %key, %expires_at, "Caching upstream payload");
        self.cache.put(key, value, expires_at);
    }
}
