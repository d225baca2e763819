use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::types::{format_minute_of_day, AvailabilityWindow, MINUTES_PER_DAY};

/// A tutor's configured availability: recurring weekday windows plus one-off
/// date exceptions. Read-only to the booking core; the tutor edits it through
/// the profile subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub windows: Vec<AvailabilityWindow>,
}

impl WeeklyAvailability {
    pub fn new(windows: Vec<AvailabilityWindow>) -> Result<Self, BookingError> {
        let availability = Self { windows };
        availability.validate()?;
        Ok(availability)
    }

    fn validate(&self) -> Result<(), BookingError> {
        for window in &self.windows {
            if window.weekday.is_none() && window.date.is_none() {
                return Err(BookingError::Validation(
                    "availability window must name a weekday or a date".into(),
                ));
            }
            if let Some(weekday) = window.weekday {
                if weekday > 6 {
                    return Err(BookingError::Validation(format!(
                        "weekday {weekday} is out of range (0-6, 0 = Sunday)"
                    )));
                }
            }
            if window.start_minute >= window.end_minute {
                return Err(BookingError::Validation(format!(
                    "window {}-{} must start before it ends",
                    format_minute_of_day(window.start_minute),
                    format_minute_of_day(window.end_minute),
                )));
            }
            if window.end_minute >= MINUTES_PER_DAY {
                return Err(BookingError::Validation(format!(
                    "window end {} exceeds the last minute of the day",
                    window.end_minute
                )));
            }
        }

        // Open windows on the same weekday or date must not overlap; a closed
        // override coexisting with open windows is allowed and wins at query
        // time.
        for (index, first) in self.windows.iter().enumerate() {
            for second in &self.windows[index + 1..] {
                if first.is_available
                    && second.is_available
                    && covers_same_day(first, second)
                    && first.start_minute < second.end_minute
                    && second.start_minute < first.end_minute
                {
                    return Err(BookingError::Validation(format!(
                        "windows {}-{} and {}-{} overlap",
                        format_minute_of_day(first.start_minute),
                        format_minute_of_day(first.end_minute),
                        format_minute_of_day(second.start_minute),
                        format_minute_of_day(second.end_minute),
                    )));
                }
            }
        }
        Ok(())
    }

    /// Windows applying to `date`, sorted by start. Exceptions for the exact
    /// date replace the recurring weekday set; any closed override empties
    /// the day.
    pub fn windows_for(&self, date: NaiveDate) -> Vec<AvailabilityWindow> {
        let exceptions: Vec<&AvailabilityWindow> = self
            .windows
            .iter()
            .filter(|window| window.date == Some(date))
            .collect();

        let relevant = if exceptions.is_empty() {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            self.windows
                .iter()
                .filter(|window| window.date.is_none() && window.weekday == Some(weekday))
                .collect()
        } else {
            exceptions
        };

        if relevant.iter().any(|window| !window.is_available) {
            return vec![];
        }

        let mut open: Vec<AvailabilityWindow> = relevant.into_iter().copied().collect();
        open.sort_unstable_by_key(|window| window.start_minute);
        open
    }
}

fn covers_same_day(first: &AvailabilityWindow, second: &AvailabilityWindow) -> bool {
    match (first.date, second.date) {
        (Some(a), Some(b)) => a == b,
        (None, None) => first.weekday == second.weekday,
        _ => false,
    }
}
