use observability_app::config::Config;
use observability_app::services::metrics::MetricsRegistry;
use observability_app::services::uptime::UptimeTracker;
use observability_app::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Captured before anything else so uptime covers the whole process
    let uptime = UptimeTracker::new();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "observability_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let metrics = MetricsRegistry::new()?;
    if config.process_metrics {
        metrics.register_process_collector()?;
    }

    let state = Arc::new(AppState::new(uptime, metrics, config.metrics_path_label));
    let app = observability_app::create_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        started_at = %uptime.started_at_rfc3339(),
        path_label = ?config.metrics_path_label,
        "Docker/K8s Observability App v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(uptime_seconds = uptime.uptime_seconds(), "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
