use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

use crate::booking::{self, BookingRequest};
use crate::error::BookingError;
use crate::gateway::PersistenceGateway;
use crate::notifier::NotificationDispatcher;
use crate::query;
use crate::types::{format_minute_of_day, CandidateSlot, SessionStatus};
use crate::AppState;

#[derive(Debug, Clone, Deserialize, Validate)]
struct SlotsQuery {
    tutor_id: Uuid,
    /// Interpreted in UTC, the platform's canonical zone.
    date: NaiveDate,
    #[validate(range(min = 30, max = 180))]
    duration_minutes: u16,
    #[validate(range(min = 1, max = 1440))]
    step_minutes: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SlotDto {
    start: String,
    end: String,
    available: bool,
}

impl From<CandidateSlot> for SlotDto {
    fn from(slot: CandidateSlot) -> Self {
        Self {
            start: format_minute_of_day(slot.start_minute),
            end: format_minute_of_day(slot.end_minute),
            available: slot.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotsResponse {
    slots: Vec<SlotDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookBody {
    student_id: Uuid,
    tutor_id: Uuid,
    subject_id: Uuid,
    scheduled_at: DateTime<Utc>,
    #[validate(range(min = 30, max = 180))]
    duration_minutes: u16,
    notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookResponse {
    id: Uuid,
    status: SessionStatus,
    price_cents: i64,
    scheduled_at: DateTime<Utc>,
    duration_minutes: u16,
}

pub fn create_app<G, N>(state: AppState<G, N>) -> Router
where
    G: PersistenceGateway,
    N: NotificationDispatcher + Clone,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/slots", get(get_slots))
        .route("/book", post(book_session))
        .with_state(state)
        .layer(cors)
}

async fn get_slots<G, N>(
    State(state): State<AppState<G, N>>,
    Query(params): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, BookingError>
where
    G: PersistenceGateway,
    N: NotificationDispatcher + Clone,
{
    params
        .validate()
        .map_err(|err| BookingError::Validation(err.to_string()))?;

    let slots = query::query_slots(
        &state.gateway,
        params.tutor_id,
        params.date,
        params.duration_minutes,
        params.step_minutes,
        Utc::now(),
    )?;

    Ok(Json(SlotsResponse {
        slots: slots.into_iter().map(SlotDto::from).collect(),
    }))
}

async fn book_session<G, N>(
    State(state): State<AppState<G, N>>,
    Json(body): Json<BookBody>,
) -> Result<(StatusCode, Json<BookResponse>), BookingError>
where
    G: PersistenceGateway,
    N: NotificationDispatcher + Clone,
{
    body.validate()
        .map_err(|err| BookingError::Validation(err.to_string()))?;

    let request = BookingRequest {
        student_id: body.student_id,
        tutor_id: body.tutor_id,
        subject_id: body.subject_id,
        scheduled_at: body.scheduled_at,
        duration_minutes: body.duration_minutes,
        notes: body.notes,
        price_cents: None,
    };

    let session = booking::book(&state.gateway, &state.notifier, &request, Utc::now())?;

    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            id: session.id,
            status: session.status,
            price_cents: session.price_cents,
            scheduled_at: session.scheduled_at,
            duration_minutes: session.duration_minutes,
        }),
    ))
}
