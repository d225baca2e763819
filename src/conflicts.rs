use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::types::{BookedSession, CandidateSlot};

/// Half-open interval intersection: intervals that merely touch at a
/// boundary do not conflict.
pub fn intervals_overlap(
    first_start: DateTime<Utc>,
    first_end: DateTime<Utc>,
    second_start: DateTime<Utc>,
    second_end: DateTime<Utc>,
) -> bool {
    first_start < second_end && first_end > second_start
}

/// Lifts a minute-of-day on `date` to an absolute UTC instant.
pub fn minute_on_date(date: NaiveDate, minute: u16) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::minutes(i64::from(minute))
}

/// Marks every candidate that intersects a calendar-blocking session as
/// unavailable. Completed and cancelled sessions never block.
pub fn mark(
    date: NaiveDate,
    candidates: Vec<CandidateSlot>,
    sessions: &[BookedSession],
) -> Vec<CandidateSlot> {
    let blocking: Vec<(DateTime<Utc>, DateTime<Utc>)> = sessions
        .iter()
        .filter(|session| session.status.blocks_calendar())
        .map(|session| (session.scheduled_at, session.ends_at()))
        .collect();

    candidates
        .into_iter()
        .map(|slot| {
            let start = minute_on_date(date, slot.start_minute);
            let end = minute_on_date(date, slot.end_minute);
            let taken = blocking
                .iter()
                .any(|(session_start, session_end)| {
                    intervals_overlap(start, end, *session_start, *session_end)
                });
            CandidateSlot {
                available: slot.available && !taken,
                ..slot
            }
        })
        .collect()
}
