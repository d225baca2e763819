use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::{format_minute_of_day, AvailabilityWindow};

/// Failure inside the persistence layer (connection loss, transaction abort
/// unrelated to a booking conflict). Conflicts are not errors, they are
/// reported through `InsertOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("persistence failure: {0}")]
pub struct GatewayError(pub String);

#[derive(Debug, PartialEq, Error)]
pub enum BookingError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("requested time is outside the tutor's availability")]
    OutsideAvailability { windows: Vec<AvailabilityWindow> },

    #[error("requested time conflicts with an existing session")]
    SlotConflict,

    #[error(transparent)]
    Persistence(#[from] GatewayError),
}

impl BookingError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::OutsideAvailability { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "OUTSIDE_AVAILABILITY")
            }
            Self::SlotConflict => (StatusCode::CONFLICT, "SLOT_CONFLICT"),
            Self::Persistence(_) => (StatusCode::BAD_GATEWAY, "PERSISTENCE"),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let hint = match &self {
            Self::OutsideAvailability { windows } => Some(
                windows
                    .iter()
                    .map(|window| {
                        format!(
                            "{}-{}",
                            format_minute_of_day(window.start_minute),
                            format_minute_of_day(window.end_minute)
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
                "hint": hint,
            }
        }));
        (status, body).into_response()
    }
}
