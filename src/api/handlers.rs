//! SOS, status and health endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::responses::{
    ApiError, ApiResponse, Confirmation, HealthResponse, StatusResponse, TrackingResponse,
};
use crate::{
    sos::{Confirmed, QuickAction},
    state::{AppState, Notice},
};

/// Handle POST /sos/activate - Ask for confirmation, then start the countdown
pub async fn sos_activate_handler(
    State(state): State<Arc<AppState>>,
    Confirmation(choice): Confirmation,
) -> Result<Json<ApiResponse>, ApiError> {
    let sos = &state.sos;
    let Some(choice) = choice else {
        return Ok(Json(ApiResponse::confirmation_required(
            sos.activation_prompt(),
            sos.snapshot(),
        )));
    };

    state.record_action("sos-activate");
    match sos.request_activation(choice)? {
        Confirmed::Declined => Ok(Json(ApiResponse::declined(
            "SOS activation cancelled",
            sos.snapshot(),
        ))),
        Confirmed::Applied(phase) => {
            info!("SOS activate endpoint called - now {}", phase);
            Ok(Json(ApiResponse::ok(
                format!("SOS activating in {} seconds", sos.settings().countdown_seconds),
                sos.snapshot(),
            )))
        }
    }
}

/// Handle POST /sos/cancel - Abort the countdown
pub async fn sos_cancel_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.record_action("sos-cancel");
    state.sos.cancel_countdown()?;
    Ok(Json(ApiResponse::ok("SOS countdown cancelled", state.sos.snapshot())))
}

/// Handle POST /sos/skip - Activate without waiting for the countdown
pub async fn sos_skip_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.record_action("sos-skip");
    state.sos.skip_countdown()?;
    Ok(Json(ApiResponse::ok("SOS activated", state.sos.snapshot())))
}

/// Handle POST /sos/deactivate - Ask for confirmation, then stand down
pub async fn sos_deactivate_handler(
    State(state): State<Arc<AppState>>,
    Confirmation(choice): Confirmation,
) -> Result<Json<ApiResponse>, ApiError> {
    let sos = &state.sos;
    let Some(choice) = choice else {
        return Ok(Json(ApiResponse::confirmation_required(
            sos.deactivation_prompt(),
            sos.snapshot(),
        )));
    };

    state.record_action("sos-deactivate");
    match sos.deactivate(choice)? {
        Confirmed::Declined => Ok(Json(ApiResponse::declined(
            "SOS remains active",
            sos.snapshot(),
        ))),
        Confirmed::Applied(_) => Ok(Json(ApiResponse::ok("SOS deactivated", sos.snapshot()))),
    }
}

/// Handle POST /sos/quick/:action - Fire-and-forget emergency shortcut
pub async fn quick_action_handler(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let action: QuickAction = action.parse().map_err(|e: String| {
        warn!("{}", e);
        ApiError::new(StatusCode::NOT_FOUND, e)
    })?;

    state.record_action(action.as_str());
    state.sos.quick_action(action);
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(
            format!("{} started", action),
            state.sos.snapshot(),
        )),
    ))
}

/// Handle GET /notices - Recent user-visible notices, newest first
pub async fn notices_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Notice>> {
    Json(state.notices.recent())
}

/// Handle GET /status - Return current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    let pulse_scale = *state.sos.pulse_scale().borrow();

    Json(StatusResponse {
        alert: state.sos.snapshot(),
        pulse_scale,
        dark_mode: state.theme.is_dark(),
        current_status: state.get_checkin().current,
        tracking: TrackingResponse::from(state.get_tracking()),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
