use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// Liveness payload. `status` is always `"UP"` while the process serves requests.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub service: String,
    pub message: String,
    /// Milliseconds since the Unix epoch, never lower than a previously reported value.
    pub timestamp: i64,
    /// `"available"` or `"unavailable"`; does not affect `status`.
    pub ocr_engine: String,
}

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr_engine = if state.pipeline.recognizer().is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthData {
        status: "UP".to_string(),
        service: state.config.server.service_name.clone(),
        message: "Service is running successfully".to_string(),
        timestamp: state.clock.now_millis(),
        ocr_engine: ocr_engine.to_string(),
    })
}
