//! Contacts, theme, check-in and tracking endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::responses::{
    ApiError, ContactRequest, StatusUpdateRequest, ThemeResponse, TrackingResponse,
    TrackingSettingsRequest, TrackingStartRequest,
};
use crate::state::{AppState, CheckInBoard, CheckInSettings, Contact, StatusEntry};

/// Handle GET /contacts
pub async fn list_contacts_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Contact>> {
    Json(state.contacts.snapshot())
}

/// Handle POST /contacts
pub async fn add_contact_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = state.contacts.add(&request.name, &request.phone)?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// Handle PUT /contacts/:id
pub async fn edit_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.contacts.edit(id, &request.name, &request.phone)?))
}

/// Handle DELETE /contacts/:id
pub async fn delete_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.contacts.delete(id)?))
}

/// Handle POST /contacts/:id/primary
pub async fn set_primary_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.contacts.set_primary(id)?))
}

fn theme_response(state: &AppState) -> ThemeResponse {
    ThemeResponse {
        dark_mode: state.theme.is_dark(),
        colors: state.theme.palette(),
    }
}

/// Handle GET /theme
pub async fn theme_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(theme_response(&state))
}

/// Handle POST /theme/toggle
pub async fn toggle_theme_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    state.theme.toggle();
    Json(theme_response(&state))
}

/// Handle GET /checkin
pub async fn checkin_handler(State(state): State<Arc<AppState>>) -> Json<CheckInBoard> {
    Json(state.get_checkin())
}

/// Handle POST /checkin - Record a status update
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatusUpdateRequest>,
) -> Json<StatusEntry> {
    state.record_action("status-update");
    Json(state.update_status(request.level, request.message).await)
}

/// Handle PUT /checkin/settings
pub async fn checkin_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<CheckInSettings>,
) -> Result<Json<CheckInBoard>, ApiError> {
    state.apply_checkin_settings(settings)?;
    Ok(Json(state.get_checkin()))
}

/// Handle GET /tracking
pub async fn tracking_handler(State(state): State<Arc<AppState>>) -> Json<TrackingResponse> {
    Json(state.get_tracking().into())
}

/// Handle POST /tracking/start
pub async fn start_tracking_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<TrackingStartRequest>>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    state.record_action("tracking-start");
    Ok(Json(state.start_tracking(request.duration_minutes)?.into()))
}

/// Handle POST /tracking/stop
pub async fn stop_tracking_handler(State(state): State<Arc<AppState>>) -> Json<TrackingResponse> {
    state.record_action("tracking-stop");
    Json(state.stop_tracking().into())
}

/// Handle PUT /tracking/settings
pub async fn tracking_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrackingSettingsRequest>,
) -> Result<Json<TrackingResponse>, ApiError> {
    if let Some(minutes) = request.duration_minutes {
        state.select_tracking_duration(minutes)?;
    }
    if let Some(share) = request.share_location {
        state.set_share_location(share);
    }
    Ok(Json(state.get_tracking().into()))
}
