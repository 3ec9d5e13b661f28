use std::{net::SocketAddr, sync::Arc};

use axum::{routing::post, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use codecall_core::{alerts::AlertService, config::Config, ports::TelephonyPort, Result};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub alerts: AlertService,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, telephony: Arc<dyn TelephonyPort>) -> Self {
        let alerts = AlertService::new(cfg.clone(), telephony);
        Self { cfg, alerts }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/voice", post(handlers::handle_voice))
        .route("/gather", post(handlers::handle_gather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` fires. A bind failure is returned
/// to the caller; it is the only fatal error at runtime.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state, shutdown).await
}

pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!("Starting server on {local}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
