//! API server entry point.

use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use repository::{BatchRepository, InMemoryBatchRepository, PostgresBatchRepository};
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<R: BatchRepository + 'static>(config: &Config, repo: R, metrics: PrometheusHandle) {
    let state = api::create_default_state(repo);
    let app = api::create_app(state, metrics);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    api::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the batch repository and serve
    match config.database_url.as_deref() {
        Some(url) => {
            let repo = PostgresBatchRepository::connect(url)
                .await
                .expect("failed to connect to database");
            repo.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL batch repository");
            serve(&config, repo, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory batch repository");
            serve(&config, InMemoryBatchRepository::new(), metrics_handle).await;
        }
    }
}
