//! Main panel server implementation

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::{service_info, ServiceId};

use crate::error::{PanelError, PanelResult};
use crate::state::PanelState;
use crate::web::handlers::api;

/// Build the axum router over shared panel state
pub fn build_router(state: Arc<PanelState>) -> Router {
    Router::new()
        .route("/api/heartbeat", post(api::heartbeat))
        .route("/api/status", post(api::post_status).get(api::get_status))
        .route("/api/should_send_status", get(api::should_send_status))
        .route("/health", get(api::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub struct PanelServer {
    bind_address: SocketAddr,
    state: Arc<PanelState>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl PanelServer {
    pub fn new(bind_address: SocketAddr, state: PanelState) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            bind_address,
            state: Arc::new(state),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Serve until the shutdown sender fires
    pub async fn run(self) -> PanelResult<()> {
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| PanelError::ServerStartup(format!("Failed to bind to {}: {}", self.bind_address, e)))?;

        let local_addr = listener.local_addr()?;
        service_info!(ServiceId::current(), "🌐 Panel listening on http://{}", local_addr);

        let router = build_router(self.state.clone());
        let mut shutdown_rx = self.shutdown_rx;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
