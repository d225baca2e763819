use crate::error::BookingError;
use crate::types::{AvailabilityWindow, CandidateSlot};

pub const DEFAULT_STEP_MINUTES: u16 = 60;
pub const MIN_DURATION_MINUTES: u16 = 30;
pub const MAX_DURATION_MINUTES: u16 = 180;
pub const MAX_STEP_MINUTES: u16 = 1440;

pub fn check_duration(duration_minutes: u16) -> Result<(), BookingError> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        return Err(BookingError::Validation(format!(
            "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes, got {duration_minutes}"
        )));
    }
    Ok(())
}

pub fn check_step(step_minutes: u16) -> Result<(), BookingError> {
    if step_minutes == 0 || step_minutes > MAX_STEP_MINUTES {
        return Err(BookingError::Validation(format!(
            "step must be between 1 and {MAX_STEP_MINUTES} minutes, got {step_minutes}"
        )));
    }
    Ok(())
}

/// Emits one candidate per `step_minutes` from each window's start, as long
/// as the whole session still fits before the window ends. The cursor
/// advances by the step, not the duration, so overlapping start choices stay
/// selectable. Window order is preserved.
pub fn generate(
    windows: &[AvailabilityWindow],
    duration_minutes: u16,
    step_minutes: u16,
) -> Result<Vec<CandidateSlot>, BookingError> {
    check_duration(duration_minutes)?;
    check_step(step_minutes)?;

    let mut candidates = Vec::new();
    for window in windows {
        if !window.is_available {
            continue;
        }
        let mut start = window.start_minute;
        while start + duration_minutes <= window.end_minute {
            candidates.push(CandidateSlot {
                start_minute: start,
                end_minute: start + duration_minutes,
                available: true,
            });
            start += step_minutes;
        }
    }
    Ok(candidates)
}
