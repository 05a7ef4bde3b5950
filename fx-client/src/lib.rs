//! # FX Client SDK
//!
//! A typed Rust client for the currency-rate gateway API.

use chrono::NaiveDate;
use fx_types::{CurrencyCode, PagedResult, RateSnapshot};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub cached_entries: usize,
}

/// Currency gateway API client.
pub struct FxClient {
    base_url: String,
    http: Client,
}

impl FxClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches the health report.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get("/health", &[]).await
    }

    /// Latest rates relative to `base`.
    pub async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateSnapshot, ClientError> {
        self.get(
            "/api/currency/exchange-rates",
            &[("currencyCode", base.to_string())],
        )
        .await
    }

    /// Converts `amount` of `from` into `to`.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateSnapshot, ClientError> {
        self.get(
            "/api/currency/convert",
            &[
                ("amount", amount.normalize().to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )
        .await
    }

    /// One page of the historical series between `start` and `end`.
    pub async fn historical_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &CurrencyCode,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult, ClientError> {
        self.get(
            "/api/currency/historical-rates",
            &[
                ("startDate", start.to_string()),
                ("endDate", end.to_string()),
                ("currencyCode", base.to_string()),
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
