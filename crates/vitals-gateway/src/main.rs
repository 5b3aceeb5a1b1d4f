//! vitals gateway
//!
//! - `/health`, `/healthz`: check aggregation and liveness
//! - `/metrics`, `/metrics/:name`: counters and gauges with default tags
//! - Config from `VITALS_CONFIG` (default `vitals.yaml`)

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use vitals_core::error::{Result, VitalsError};
use vitals_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "vitals-gateway starting");
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| VitalsError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VitalsError::Internal(format!("server failed: {e}")))?;

    tracing::info!("vitals-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed.
        tracing::error!(error = %e, "ctrl-c handler failed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
