use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::conflicts;
use crate::error::BookingError;
use crate::gateway::PersistenceGateway;
use crate::slots::{self, DEFAULT_STEP_MINUTES};
use crate::types::{CandidateSlot, TutorProfile};

/// Computes the bookable slots of one tutor on one date. Read-only and
/// advisory: the result can go stale the moment it is returned, booking
/// re-validates against current state.
///
/// `now` is injected so day-boundary checks stay deterministic under test;
/// all dates are interpreted in UTC, the platform's canonical zone.
pub fn query_slots<G: PersistenceGateway>(
    gateway: &G,
    tutor_id: Uuid,
    date: NaiveDate,
    duration_minutes: u16,
    step_minutes: Option<u16>,
    now: DateTime<Utc>,
) -> Result<Vec<CandidateSlot>, BookingError> {
    let step_minutes = step_minutes.unwrap_or(DEFAULT_STEP_MINUTES);
    slots::check_duration(duration_minutes)?;
    slots::check_step(step_minutes)?;
    if date < now.date_naive() {
        return Err(BookingError::Validation(format!(
            "date {date} is in the past"
        )));
    }

    let tutor = require_active_tutor(gateway, tutor_id)?;
    let availability = gateway.get_availability(tutor.id)?;
    let windows = availability.windows_for(date);
    let candidates = slots::generate(&windows, duration_minutes, step_minutes)?;
    let sessions = gateway.sessions_on_date(tutor.id, date)?;
    Ok(conflicts::mark(date, candidates, &sessions))
}

pub(crate) fn require_active_tutor<G: PersistenceGateway>(
    gateway: &G,
    tutor_id: Uuid,
) -> Result<TutorProfile, BookingError> {
    match gateway.get_tutor(tutor_id)? {
        Some(tutor) if tutor.active => Ok(tutor),
        Some(_) => Err(BookingError::NotFound(format!(
            "tutor profile {tutor_id} is inactive"
        ))),
        None => Err(BookingError::NotFound(format!(
            "tutor profile {tutor_id} does not exist"
        ))),
    }
}
