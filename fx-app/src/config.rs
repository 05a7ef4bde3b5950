//! Configuration loading from environment.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveTime;
use chrono_tz::Tz;

use fx_hex::DEFAULT_UPSTREAM_URL;
use fx_types::ExclusionPolicy;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_base_url: String,
    pub upstream_max_retries: u32,
    pub upstream_retry_delay: Duration,
    pub upstream_timeout: Duration,
    pub expiry_timezone: Tz,
    pub expiry_publish_time: NaiveTime,
    pub excluded_currencies: Vec<String>,
    pub rate_limit_per_minute: u32,
    /// Proxies whose `X-Forwarded-For` header names the client.
    pub trusted_proxies: Vec<IpAddr>,
    /// `None` disables the background sweep.
    pub cache_sweep_interval: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_or(&lookup, "PORT", 3000)?;

        let upstream_base_url =
            lookup("UPSTREAM_BASE_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let upstream_max_retries = parse_or(&lookup, "UPSTREAM_MAX_RETRIES", 3)?;
        let upstream_retry_delay =
            Duration::from_millis(parse_or(&lookup, "UPSTREAM_RETRY_DELAY_MS", 200)?);
        let upstream_timeout = Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?);

        let expiry_timezone = match lookup("EXPIRY_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("EXPIRY_TIMEZONE: {}", e))?,
            None => fx_hex::ExpiryScheduler::DEFAULT_ZONE,
        };

        let expiry_publish_time = match lookup("EXPIRY_PUBLISH_TIME") {
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .with_context(|| format!("EXPIRY_PUBLISH_TIME must be HH:MM, got {raw:?}"))?,
            None => fx_hex::ExpiryScheduler::default().publish_time(),
        };

        let excluded_currencies = match lookup("EXCLUDED_CURRENCIES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_uppercase)
                .collect(),
            None => ExclusionPolicy::DEFAULT_DENIED
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let rate_limit_per_minute = parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 100)?;

        let trusted_proxies = match lookup("TRUSTED_PROXIES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<IpAddr>()
                        .with_context(|| format!("TRUSTED_PROXIES has an invalid address: {s:?}"))
                })
                .collect::<anyhow::Result<_>>()?,
            None => Vec::new(),
        };

        let sweep_secs: u64 = parse_or(&lookup, "CACHE_SWEEP_INTERVAL_SECS", 300)?;
        let cache_sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        Ok(Self {
            port,
            upstream_base_url,
            upstream_max_retries,
            upstream_retry_delay,
            upstream_timeout,
            expiry_timezone,
            expiry_publish_time,
            excluded_currencies,
            rate_limit_per_minute,
            trusted_proxies,
            cache_sweep_interval,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_base_url, "https://api.frankfurter.app");
        assert_eq!(config.upstream_max_retries, 3);
        assert_eq!(config.expiry_timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.expiry_publish_time, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(config.excluded_currencies, vec!["TRY", "PLN", "THB", "MXN"]);
        assert_eq!(config.cache_sweep_interval, Some(Duration::from_secs(300)));
        assert!(config.trusted_proxies.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("EXPIRY_TIMEZONE", "UTC"),
            ("EXPIRY_PUBLISH_TIME", "14:00"),
            ("EXCLUDED_CURRENCIES", "chf, ,sek"),
            ("CACHE_SWEEP_INTERVAL_SECS", "0"),
            ("TRUSTED_PROXIES", "10.0.0.1, ::1"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.expiry_timezone, chrono_tz::UTC);
        assert_eq!(config.expiry_publish_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(config.excluded_currencies, vec!["CHF", "SEK"]);
        assert_eq!(config.cache_sweep_interval, None);
        assert_eq!(
            config.trusted_proxies,
            vec![
                "10.0.0.1".parse::<IpAddr>().unwrap(),
                "::1".parse::<IpAddr>().unwrap()
            ]
        );
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("EXPIRY_TIMEZONE", "Mars/Olympus")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("EXPIRY_PUBLISH_TIME", "4pm")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("TRUSTED_PROXIES", "proxy.local")])).is_err());
    }
}
