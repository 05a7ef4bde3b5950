//! Process-wide rate cache with absolute per-entry expiry.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use fx_types::{HistoricalSeries, RateSnapshot};

/// A cached provider payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRates {
    Snapshot(RateSnapshot),
    Series(HistoricalSeries),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedRates,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Key/value store shared by every request.
///
/// Expiry is the only removal mechanism: stale entries are dropped on lookup
/// or by [`RateCache::purge_expired`].
#[derive(Debug, Default)]
pub struct RateCache {
    entries: DashMap<String, CacheEntry>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key` if it is still live at `now`.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CachedRates> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                debug!(key, "Cache HIT");
                return Some(entry.value.clone());
            }
        } else {
            debug!(key, "Cache MISS");
            return None;
        }

        // Shard guard is released above; re-check so a fresh `put` racing us survives.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        debug!(key, "Cache entry expired");
        None
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: CachedRates, expires_at: DateTime<Utc>) {
        let key = key.into();
        debug!(key = %key, %expires_at, "Cache PUT");
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Drops every entry expired at `now`. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache keys, one shape per gateway operation.
pub(crate) mod keys {
    use chrono::NaiveDate;
    use fx_types::CurrencyCode;
    use rust_decimal::Decimal;

    pub fn latest(base: &CurrencyCode) -> String {
        format!("latest:{base}")
    }

    pub fn convert(amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> String {
        format!("convert:{amount}:{from}:{to}")
    }

    pub fn historical(start: NaiveDate, end: NaiveDate, base: &CurrencyCode) -> String {
        format!(
            "historical:{}:{}:{base}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }
}
