//! # FX Gateway Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the upstream transport and retrying fetcher
//! - Create the currency gateway over a shared rate cache
//! - Start the cache sweeper and the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_hex::{
    CurrencyGateway, ExpiryScheduler, RateCache, ReqwestTransport, RetryingFetcher,
    inbound::{HttpServer, RateLimiterState},
};
use fx_types::{CurrencyCode, ExclusionPolicy};

/// Buckets refill within a minute, so idle clients are dropped at this pace.
const LIMITER_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing; endpoint comes from OTEL_EXPORTER_OTLP_ENDPOINT
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("fx-gateway"), provider))
}

fn spawn_cache_sweeper(cache: Arc<RateCache>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = cache.purge_expired(chrono::Utc::now());
            if purged > 0 {
                tracing::debug!(purged, remaining = cache.len(), "Swept expired cache entries");
            }
        }
    });
}

fn spawn_limiter_sweeper(limiter: Arc<RateLimiterState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let remaining = limiter.purge_stale();
            tracing::debug!(remaining, "Pruned idle rate-limit buckets");
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // OpenTelemetry export is opt-in
    let otel = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        Some(init_tracer()?)
    } else {
        None
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fx_app=debug,fx_hex=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting FX gateway on port {}", config.port);
    tracing::info!(
        upstream = %config.upstream_base_url,
        max_retries = config.upstream_max_retries,
        zone = %config.expiry_timezone,
        publish_time = %config.expiry_publish_time,
        "Upstream and expiry settings"
    );

    let transport = ReqwestTransport::new(config.upstream_timeout)?;
    let fetcher = RetryingFetcher::new(transport)
        .with_max_retries(config.upstream_max_retries)
        .with_delay(config.upstream_retry_delay);

    let cache = Arc::new(RateCache::new());
    if let Some(every) = config.cache_sweep_interval {
        spawn_cache_sweeper(Arc::clone(&cache), every);
    }

    let policy = ExclusionPolicy::new(config.excluded_currencies.iter());
    tracing::info!(
        excluded = ?policy.denied().map(CurrencyCode::as_str).collect::<Vec<_>>(),
        "Conversion exclusion policy"
    );

    // Create the gateway service
    let gateway = CurrencyGateway::new(fetcher, cache)
        .with_base_url(config.upstream_base_url.as_str())
        .with_scheduler(ExpiryScheduler::new(
            config.expiry_timezone,
            config.expiry_publish_time,
        ))
        .with_policy(policy);

    let limiter = Arc::new(
        RateLimiterState::per_minute(config.rate_limit_per_minute)
            .with_trusted_proxies(config.trusted_proxies.iter().copied()),
    );
    spawn_limiter_sweeper(Arc::clone(&limiter));

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limiter(gateway, limiter);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
