//! End-to-end tests for the HTTP surface.
//!
//! The router is driven in-process with `oneshot`; the provider is a
//! wiremock server so the real reqwest transport and retry layer are used.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fx_hex::{CurrencyGateway, RateCache, ReqwestTransport, RetryingFetcher, inbound::HttpServer};

const SERIES: &str = r#"{
    "amount": 1.0,
    "base": "USD",
    "start_date": "2024-02-01",
    "end_date": "2024-02-07",
    "rates": {
        "2024-02-01": {"EUR": 0.9245},
        "2024-02-02": {"EUR": 0.9221},
        "2024-02-05": {"EUR": 0.9291},
        "2024-02-06": {"EUR": 0.9287},
        "2024-02-07": {"EUR": 0.9278}
    }
}"#;

/// Helper to build a router whose gateway talks to `upstream`.
fn app(upstream: &MockServer) -> axum::Router {
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let gateway = CurrencyGateway::new(RetryingFetcher::new(transport), Arc::new(RateCache::new()))
        .with_base_url(upstream.uri());
    HttpServer::with_rate_limit(gateway, 1_000).router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_exchange_rates_defaults_to_eur_and_caches() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"amount":1.0,"base":"EUR","date":"2024-05-08","rates":{"USD":1.0751}}"#,
        ))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(&upstream);
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/api/currency/exchange-rates"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["base"], "EUR");
        let usd = json["rates"]["USD"].as_f64().unwrap();
        assert!((usd - 1.0751).abs() < 1e-9);
    }
    // `expect(1)` is verified when the mock server drops.
}

#[tokio::test]
async fn test_convert_normalizes_codes() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("amount", "25"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "JPY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"amount":25.0,"base":"USD","date":"2024-05-08","rates":{"JPY":3884.5}}"#,
        ))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(get("/api/currency/convert?amount=25&from=usd&to=jpy"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let jpy = json_body(response).await["rates"]["JPY"].as_f64().unwrap();
    assert!((jpy - 3884.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_convert_excluded_pair_never_reaches_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(get("/api/currency/convert?amount=10&from=try&to=USD"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("TRY") && message.contains("USD"), "{message}");
}

#[tokio::test]
async fn test_historical_rates_paginates() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024-02-01..2024-02-07"))
        .and(query_param("base", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERIES))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(&upstream);
    let response = app
        .clone()
        .oneshot(get(
            "/api/currency/historical-rates?startDate=2024-02-01&endDate=2024-02-07&currencyCode=usd&page=2&pageSize=2",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["totalCount"], 5);
    assert_eq!(json["page"], 2);
    assert_eq!(json["pageSize"], 2);
    assert_eq!(json["startDate"], "2024-02-01");
    assert!(json.get("total_count").is_none());
    let dates: Vec<&String> = json["rates"].as_object().unwrap().keys().collect();
    assert_eq!(dates, vec!["2024-02-05", "2024-02-06"]);

    let response = app
        .oneshot(get(
            "/api/currency/historical-rates?startDate=2024-02-01&endDate=2024-02-07&currencyCode=USD&page=10",
        ))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["totalCount"], 5);
    assert!(json["rates"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_historical_rates_rejects_page_zero() {
    let upstream = MockServer::start().await;

    let response = app(&upstream)
        .oneshot(get(
            "/api/currency/historical-rates?startDate=2024-02-01&endDate=2024-02-07&page=0",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], 400);
}

#[tokio::test]
async fn test_malformed_page_is_json_error() {
    let upstream = MockServer::start().await;

    let response = app(&upstream)
        .oneshot(get(
            "/api/currency/historical-rates?startDate=2024-02-01&endDate=2024-02-07&page=-1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], 400);
    assert!(json["error"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_missing_amount_is_json_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(get("/api/currency/convert?from=USD&to=GBP"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], 400);
    assert!(json["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_upstream_error_status_is_forwarded_after_retries() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&upstream)
        .await;

    let response = app(&upstream)
        .oneshot(get("/api/currency/exchange-rates?currencyCode=XYZ"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Not Found");
    assert_eq!(json["code"], 404);
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let transport = ReqwestTransport::new(Duration::from_millis(500)).unwrap();
    let gateway = CurrencyGateway::new(RetryingFetcher::new(transport), Arc::new(RateCache::new()))
        .with_base_url("http://127.0.0.1:9");
    let app = HttpServer::new(gateway).router();

    let response = app
        .oneshot(get("/api/currency/exchange-rates?currencyCode=USD"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let upstream = MockServer::start().await;
    let app = app(&upstream);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cachedEntries"], 0);

    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/currency/convert"].is_object());
}
