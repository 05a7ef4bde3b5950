//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use fx_types::{ConvertQuery, CurrencyCode, ExchangeRatesQuery, HistoricalRatesQuery, PagedResult, RateSnapshot};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy", "cachedEntries": 3}))
    )
)]
async fn health() {}

/// Latest exchange rates for a base currency
#[utoipa::path(
    get,
    path = "/api/currency/exchange-rates",
    tag = "currency",
    params(ExchangeRatesQuery),
    responses(
        (status = 200, description = "Latest rates", body = RateSnapshot),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider unreachable")
    )
)]
async fn exchange_rates() {}

/// Convert an amount between two currencies
#[utoipa::path(
    get,
    path = "/api/currency/convert",
    tag = "currency",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Converted amount", body = RateSnapshot),
        (status = 400, description = "Conversion involves an excluded currency",
            example = json!({"error": "Currency conversion for the TRY to USD currency is not allowed.", "code": 400})),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider unreachable")
    )
)]
async fn convert() {}

/// Paginated historical rates between two dates
#[utoipa::path(
    get,
    path = "/api/currency/historical-rates",
    tag = "currency",
    params(HistoricalRatesQuery),
    responses(
        (status = 200, description = "One page of the series", body = PagedResult),
        (status = 400, description = "Page or page size below 1"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider unreachable")
    )
)]
async fn historical_rates() {}

/// OpenAPI documentation for the rate gateway.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Rate Gateway API",
        version = "1.0.0",
        description = "Latest rates, conversions and historical ranges from the reference-rate provider.\n\nResponses are cached until the provider's next business-day publication (16:00 CET).",
        license(name = "MIT"),
    ),
    paths(health, exchange_rates, convert, historical_rates),
    components(schemas(RateSnapshot, PagedResult, CurrencyCode)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currency", description = "Exchange rate operations"),
    )
)]
pub struct ApiDoc;
