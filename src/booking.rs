use chrono::{DateTime, Duration, Timelike, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::conflicts::intervals_overlap;
use crate::error::BookingError;
use crate::gateway::{InsertOutcome, PersistenceGateway};
use crate::notifier::NotificationDispatcher;
use crate::query::require_active_tutor;
use crate::slots::check_duration;
use crate::types::{BookedSession, SessionStatus};

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u16,
    pub notes: Option<String>,
    /// Price override for trusted callers; derived from the tutor's hourly
    /// rate when absent.
    pub price_cents: Option<i64>,
}

enum Attempt {
    Created(BookedSession),
    /// The atomic insert lost a race: the slot was free at re-check time but
    /// taken at commit time.
    LostRace,
}

/// Validates and commits one booking. The earlier `query_slots` result the
/// client acted on is advisory only; this re-checks everything against
/// current gateway state. A lost insert race re-runs the whole transaction
/// once before the conflict becomes the caller's answer.
pub fn book<G, N>(
    gateway: &G,
    notifier: &N,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<BookedSession, BookingError>
where
    G: PersistenceGateway,
    N: NotificationDispatcher,
{
    let session = match try_book(gateway, request, now)? {
        Attempt::Created(session) => session,
        Attempt::LostRace => match try_book(gateway, request, now)? {
            Attempt::Created(session) => session,
            Attempt::LostRace => return Err(BookingError::SlotConflict),
        },
    };

    // Best-effort: the booking stands even if the tutor cannot be reached.
    if let Err(err) = notifier.notify_tutor_of_booking_request(session.tutor_id, &session) {
        warn!(?err, session_id = %session.id, "failed to notify tutor of booking request");
    }
    Ok(session)
}

fn try_book<G: PersistenceGateway>(
    gateway: &G,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Attempt, BookingError> {
    check_duration(request.duration_minutes)?;
    for (label, id) in [
        ("student", request.student_id),
        ("tutor", request.tutor_id),
        ("subject", request.subject_id),
    ] {
        if id.is_nil() {
            return Err(BookingError::Validation(format!(
                "{label} identifier must not be empty"
            )));
        }
    }
    if request.scheduled_at < now {
        return Err(BookingError::Validation(
            "scheduled_at is in the past".into(),
        ));
    }
    if request.scheduled_at.second() != 0 || request.scheduled_at.nanosecond() != 0 {
        return Err(BookingError::Validation(
            "scheduled_at must be aligned to a whole minute".into(),
        ));
    }

    let tutor = require_active_tutor(gateway, request.tutor_id)?;
    if !tutor.subject_ids.contains(&request.subject_id) {
        return Err(BookingError::NotFound(format!(
            "tutor does not offer subject {}",
            request.subject_id
        )));
    }

    // The whole interval must lie inside one availability window of the
    // session's UTC date.
    let date = request.scheduled_at.date_naive();
    let windows = gateway.get_availability(tutor.id)?.windows_for(date);
    let start_minute = request.scheduled_at.hour() * 60 + request.scheduled_at.minute();
    let end_minute = start_minute + u32::from(request.duration_minutes);
    let inside = windows.iter().any(|window| {
        u32::from(window.start_minute) <= start_minute
            && end_minute <= u32::from(window.end_minute)
    });
    if !inside {
        return Err(BookingError::OutsideAvailability { windows });
    }

    // Authoritative conflict check against current sessions, not the
    // client's stale slot list.
    let start = request.scheduled_at;
    let end = start + Duration::minutes(i64::from(request.duration_minutes));
    let sessions = gateway.sessions_on_date(tutor.id, date)?;
    let clashing = sessions
        .iter()
        .filter(|session| session.status.blocks_calendar())
        .any(|session| intervals_overlap(start, end, session.scheduled_at, session.ends_at()));
    if clashing {
        return Err(BookingError::SlotConflict);
    }

    let price_cents = match request.price_cents {
        Some(price) if price > 0 => price,
        Some(price) => {
            return Err(BookingError::Validation(format!(
                "supplied price must be positive, got {price}"
            )));
        }
        None => {
            if tutor.hourly_rate_cents <= 0 {
                return Err(BookingError::Validation(
                    "tutor has no usable hourly rate".into(),
                ));
            }
            tutor.hourly_rate_cents * i64::from(request.duration_minutes) / 60
        }
    };

    let candidate = BookedSession {
        id: Uuid::new_v4(),
        student_id: request.student_id,
        tutor_id: tutor.id,
        subject_id: request.subject_id,
        scheduled_at: request.scheduled_at,
        duration_minutes: request.duration_minutes,
        // Platform policy: bookings await tutor confirmation.
        status: SessionStatus::Pending,
        price_cents,
        notes: request.notes.clone().unwrap_or_default(),
        meeting_link: None,
    };

    // Transient storage failures get one retry of the atomic step itself.
    let outcome = match gateway.insert_session_if_no_conflict(candidate.clone()) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(?err, "session insert failed, retrying once");
            gateway.insert_session_if_no_conflict(candidate)?
        }
    };

    match outcome {
        InsertOutcome::Created(session) => Ok(Attempt::Created(session)),
        InsertOutcome::Conflict => Ok(Attempt::LostRace),
    }
}
