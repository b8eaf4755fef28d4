// HTTP request handlers of the simulated device
use crate::infrastructure::simulated_device::{now_ms, SimulatedDevice, SimulatedStatus};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{Map, Value};
use std::sync::{Arc, MutexGuard};

fn device(state: &AppState) -> Result<MutexGuard<'_, SimulatedDevice>, StatusCode> {
    state.device.lock().map_err(|_| {
        tracing::error!("Simulated device state is poisoned");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SimulatedStatus>, StatusCode> {
    let mut device = device(&state)?;
    device.advance(now_ms());
    Ok(Json(device.status()))
}

/// CSV log, oldest sample first
pub async fn get_log(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StatusCode> {
    let mut device = device(&state)?;
    device.advance(now_ms());
    Ok(([(header::CONTENT_TYPE, "text/csv")], device.log_csv()))
}

pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    Ok(Json(device(&state)?.config()))
}

/// Apply a config update and send the client to the status page
pub async fn post_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<Map<String, Value>>,
) -> Response {
    let mut device = match device(&state) {
        Ok(device) => device,
        Err(status) => return status.into_response(),
    };

    match device.apply_config(&update) {
        Ok(()) => Redirect::to("/api/status").into_response(),
        Err(e) => {
            tracing::warn!("Rejected config update: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

pub async fn restart(State(state): State<Arc<AppState>>) -> StatusCode {
    match device(&state) {
        Ok(mut device) => {
            tracing::info!("Received restart request from API");
            device.reset(now_ms());
            StatusCode::NO_CONTENT
        }
        Err(status) => status,
    }
}
