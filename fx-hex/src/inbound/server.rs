//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use fx_types::UpstreamTransport;

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::CurrencyGateway;

/// HTTP Server for the rate gateway API.
pub struct HttpServer<T: UpstreamTransport> {
    state: Arc<AppState<T>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<T: UpstreamTransport> HttpServer<T> {
    /// Creates a new HTTP server with the given gateway.
    pub fn new(gateway: CurrencyGateway<T>) -> Self {
        Self {
            state: Arc::new(AppState { gateway }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(gateway: CurrencyGateway<T>, requests_per_minute: u32) -> Self {
        Self::with_rate_limiter(
            gateway,
            Arc::new(RateLimiterState::per_minute(requests_per_minute)),
        )
    }

    /// Creates a new HTTP server sharing an existing limiter.
    pub fn with_rate_limiter(
        gateway: CurrencyGateway<T>,
        rate_limiter: Arc<RateLimiterState>,
    ) -> Self {
        Self {
            state: Arc::new(AppState { gateway }),
            rate_limiter,
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health::<T>))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route(
                "/api/currency/exchange-rates",
                get(handlers::exchange_rates::<T>),
            )
            .route("/api/currency/convert", get(handlers::convert::<T>))
            .route(
                "/api/currency/historical-rates",
                get(handlers::historical_rates::<T>),
            )
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// Peer addresses are attached to each request for the rate limiter.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router().into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
