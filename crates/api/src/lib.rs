//! HTTP API server with observability for the batch allocation system.
//!
//! Provides REST endpoints for registering batches and allocating order
//! lines, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use repository::BatchRepository;
use services::AllocationService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{Config, LogFormat};
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: BatchRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/batches", post(routes::batches::create::<R>))
        .route("/batches", get(routes::batches::list::<R>))
        .route("/batches/{reference}", get(routes::batches::get::<R>))
        .route(
            "/batches/{reference}/deallocate",
            post(routes::batches::deallocate::<R>),
        )
        .route("/allocate", post(routes::allocations::allocate::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a batch repository.
pub fn create_default_state<R: BatchRepository + 'static>(repo: R) -> Arc<AppState<R>> {
    Arc::new(AppState {
        service: AllocationService::new(repo),
    })
}

/// Installs the global tracing subscriber described by `config`.
///
/// `RUST_LOG` semantics apply to `config.log_level`; an unparsable filter
/// falls back to `info`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
