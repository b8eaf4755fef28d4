// Router of the simulated device
use crate::infrastructure::simulated_device::SimulatedDevice;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_config, get_log, get_status, health_check, post_config, restart,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn simulator(device: SimulatedDevice) -> Router {
    let state = Arc::new(AppState::new(device));

    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/status", get(get_status))
        .route("/api/log", get(get_log))
        .route("/api/config", get(get_config).post(post_config))
        .route("/api/restart", post(restart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
