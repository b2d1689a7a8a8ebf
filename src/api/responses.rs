//! API request and response structures

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ContactError, OptionError, SosError},
    sos::{AlertSnapshot, Choice, Prompt},
    state::{Palette, StatusLevel, TrackingState},
};

/// Answer to a confirmable SOS operation; absent means "show me the prompt"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    pub choice: Option<Choice>,
}

/// Body of a confirmable request. An empty body asks for the prompt; a body
/// that is present must be a valid JSON `ConfirmRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation(pub Option<Choice>);

#[async_trait]
impl<S> FromRequest<S> for Confirmation
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        if bytes.is_empty() {
            return Ok(Self(None));
        }
        if !is_json {
            return Err(ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected request with `Content-Type: application/json`",
            ));
        }
        let Json(request) = Json::<ConfirmRequest>::from_bytes(&bytes)?;
        Ok(Self(request.choice))
    }
}

/// API response structure for SOS endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub alert: AlertSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
}

impl ApiResponse {
    pub fn new(status: &str, message: impl Into<String>, alert: AlertSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            alert,
            prompt: None,
        }
    }

    pub fn ok(message: impl Into<String>, alert: AlertSnapshot) -> Self {
        Self::new("ok", message, alert)
    }

    pub fn declined(message: impl Into<String>, alert: AlertSnapshot) -> Self {
        Self::new("declined", message, alert)
    }

    /// The client must show `prompt` and call again with the user's choice
    pub fn confirmation_required(prompt: Prompt, alert: AlertSnapshot) -> Self {
        Self {
            prompt: Some(prompt),
            ..Self::new("confirmation_required", "Confirmation required", alert)
        }
    }
}

/// Overall status of the daemon
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub alert: AlertSnapshot,
    pub pulse_scale: f32,
    pub dark_mode: bool,
    pub current_status: StatusLevel,
    pub tracking: TrackingResponse,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeResponse {
    pub dark_mode: bool,
    pub colors: &'static Palette,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub level: StatusLevel,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingStartRequest {
    pub duration_minutes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingSettingsRequest {
    pub duration_minutes: Option<u64>,
    pub share_location: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingResponse {
    #[serde(flatten)]
    pub state: TrackingState,
    pub remaining_seconds: Option<u64>,
    pub remaining: String,
}

impl From<TrackingState> for TrackingResponse {
    fn from(state: TrackingState) -> Self {
        Self {
            remaining_seconds: state.remaining_seconds(),
            remaining: state.remaining_label(),
            state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by handlers, rendered as JSON
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<SosError> for ApiError {
    fn from(err: SosError) -> Self {
        Self::new(StatusCode::CONFLICT, err.to_string())
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        let status = match err {
            ContactError::NotFound(_) => StatusCode::NOT_FOUND,
            ContactError::MissingField => StatusCode::UNPROCESSABLE_ENTITY,
            ContactError::PrimaryProtected => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl From<OptionError> for ApiError {
    fn from(err: OptionError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}
