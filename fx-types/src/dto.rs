//! Data Transfer Objects for the HTTP boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{CurrencyCode, PageSpec};

fn default_currency() -> CurrencyCode {
    CurrencyCode::eur()
}

fn default_page() -> u32 {
    PageSpec::DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    PageSpec::DEFAULT_PAGE_SIZE
}

/// Query for the latest rates of one base currency.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExchangeRatesQuery {
    /// Base currency (defaults to EUR)
    #[serde(default = "default_currency")]
    #[param(value_type = String, example = "USD")]
    pub currency_code: CurrencyCode,
}

/// Query for converting an amount between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    #[param(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    #[param(value_type = String, example = "USD")]
    pub from: CurrencyCode,
    #[param(value_type = String, example = "GBP")]
    pub to: CurrencyCode,
}

/// Query for a paginated historical range.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoricalRatesQuery {
    #[param(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[param(value_type = String, example = "2024-01-31")]
    pub end_date: NaiveDate,
    #[serde(default = "default_currency")]
    #[param(value_type = String, example = "EUR")]
    pub currency_code: CurrencyCode,
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[param(example = 10)]
    pub page_size: u32,
}
