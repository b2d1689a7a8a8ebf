//! HTTP API module
//!
//! Each screen of the safety app maps to a group of routes here; the router
//! is the whole navigation shell.

pub mod events;
pub mod handlers;
pub mod profile;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::events_handler;
use handlers::*;
use profile::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sos/activate", post(sos_activate_handler))
        .route("/sos/cancel", post(sos_cancel_handler))
        .route("/sos/skip", post(sos_skip_handler))
        .route("/sos/deactivate", post(sos_deactivate_handler))
        .route("/sos/quick/:action", post(quick_action_handler))
        .route("/notices", get(notices_handler))
        .route("/events", get(events_handler))
        .route("/contacts", get(list_contacts_handler).post(add_contact_handler))
        .route(
            "/contacts/:id",
            put(edit_contact_handler).delete(delete_contact_handler),
        )
        .route("/contacts/:id/primary", post(set_primary_handler))
        .route("/theme", get(theme_handler))
        .route("/theme/toggle", post(toggle_theme_handler))
        .route("/checkin", get(checkin_handler).post(update_status_handler))
        .route("/checkin/settings", put(checkin_settings_handler))
        .route("/tracking", get(tracking_handler))
        .route("/tracking/start", post(start_tracking_handler))
        .route("/tracking/stop", post(stop_tracking_handler))
        .route("/tracking/settings", put(tracking_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
