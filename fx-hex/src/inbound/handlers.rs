//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use utoipa::OpenApi;

use fx_types::{
    ConvertQuery, ExchangeRatesQuery, GatewayError, HistoricalRatesQuery, UpstreamTransport,
};

use crate::CurrencyGateway;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<T: UpstreamTransport> {
    pub gateway: CurrencyGateway<T>,
}

/// Wrapper to implement IntoResponse for GatewayError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// `Query` extractor whose rejection uses the JSON error body.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(GatewayError::BadRequest(rejection.body_text())))?;
        Ok(Self(value))
    }
}

/// Health check endpoint.
pub async fn health<T: UpstreamTransport>(
    State(state): State<Arc<AppState<T>>>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "cachedEntries": state.gateway.cache().len()
    }))
}

/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Latest exchange rates for a base currency.
#[tracing::instrument(skip_all, fields(currency_code = %query.currency_code))]
pub async fn exchange_rates<T: UpstreamTransport>(
    State(state): State<Arc<AppState<T>>>,
    ApiQuery(query): ApiQuery<ExchangeRatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.gateway.latest_rates(query.currency_code).await?;
    Ok(Json(snapshot))
}

/// Convert an amount between two currencies.
#[tracing::instrument(skip_all, fields(from = %query.from, to = %query.to, amount = %query.amount))]
pub async fn convert<T: UpstreamTransport>(
    State(state): State<Arc<AppState<T>>>,
    ApiQuery(query): ApiQuery<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .gateway
        .convert(query.amount, query.from, query.to)
        .await?;
    Ok(Json(snapshot))
}

/// Paginated historical rates.
#[tracing::instrument(
    skip_all,
    fields(
        currency_code = %query.currency_code,
        start = %query.start_date,
        end = %query.end_date,
        page = query.page,
        page_size = query.page_size
    )
)]
pub async fn historical_rates<T: UpstreamTransport>(
    State(state): State<Arc<AppState<T>>>,
    ApiQuery(query): ApiQuery<HistoricalRatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .gateway
        .historical_rates(
            query.start_date,
            query.end_date,
            query.currency_code,
            query.page,
            query.page_size,
        )
        .await?;
    Ok(Json(page))
}
