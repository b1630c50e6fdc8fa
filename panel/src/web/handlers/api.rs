//! REST API handlers
//!
//! Launchers push batches and read directives; dashboards send heartbeats
//! and read the flattened aggregate.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use shared::{service_debug, service_warn, HeartbeatAck, ReporterDirective, SendGate, ServiceId};

use crate::core::validate_batch;
use crate::error::{PanelError, PanelResult};
use crate::state::PanelState;

/// Dashboard heartbeat - POST /api/heartbeat
pub async fn heartbeat(State(state): State<Arc<PanelState>>) -> Json<HeartbeatAck> {
    state.record_heartbeat().await;
    Json(HeartbeatAck { success: true })
}

/// Launcher status push - POST /api/status
pub async fn post_status(
    State(state): State<Arc<PanelState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> PanelResult<Json<ReporterDirective>> {
    let Json(payload) = payload.map_err(|e| PanelError::validation(e.body_text()))?;

    let batch = validate_batch(&payload).inspect_err(|e| {
        service_warn!(ServiceId::current(), error = %e, "⚠️ Rejected status batch");
    })?;

    let host_id = batch.host_id.clone();
    let bots = batch.bots.len();
    let directive = state.ingest(batch).await;
    service_debug!(ServiceId::current(), host_id = %host_id, bots, directive = ?directive, "📥 Status batch stored");

    Ok(Json(directive))
}

/// Aggregated status - GET /api/status
pub async fn get_status(State(state): State<Arc<PanelState>>) -> Json<Vec<Value>> {
    Json(state.read_all().await)
}

/// Reporter pre-check - GET /api/should_send_status
pub async fn should_send_status(State(state): State<Arc<PanelState>>) -> Json<SendGate> {
    Json(SendGate {
        should_send: state.is_active().await,
    })
}

/// Health check - GET /health
pub async fn health(State(state): State<Arc<PanelState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "hosts": state.host_count().await,
        "panelActive": state.is_active().await,
        "uptime": state.uptime().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
