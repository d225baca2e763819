use chrono::{DateTime, Duration, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MINUTES_PER_DAY: u16 = 1440;

lazy_static! {
    static ref WALL_CLOCK: Regex = Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").unwrap();
}

/// Parses an `"HH:MM"` wall-clock string into a minute-of-day value.
pub fn parse_minute_of_day(text: &str) -> Option<u16> {
    let captures = WALL_CLOCK.captures(text)?;
    let hours: u16 = captures[1].parse().ok()?;
    let minutes: u16 = captures[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

pub fn format_minute_of_day(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// One bounded period on a recurring weekday (0 = Sunday) or on one exact
/// date during which the tutor accepts bookings. `is_available = false`
/// marks a normally open day as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub weekday: Option<u8>,
    pub date: Option<NaiveDate>,
    pub start_minute: u16,
    pub end_minute: u16,
    pub is_available: bool,
}

impl AvailabilityWindow {
    pub fn recurring(weekday: u8, start_minute: u16, end_minute: u16) -> Self {
        Self {
            weekday: Some(weekday),
            date: None,
            start_minute,
            end_minute,
            is_available: true,
        }
    }

    pub fn exception(date: NaiveDate, start_minute: u16, end_minute: u16) -> Self {
        Self {
            weekday: None,
            date: Some(date),
            start_minute,
            end_minute,
            is_available: true,
        }
    }

    pub fn weekday_off(weekday: u8) -> Self {
        Self {
            is_available: false,
            ..Self::recurring(weekday, 0, MINUTES_PER_DAY - 1)
        }
    }

    pub fn day_off(date: NaiveDate) -> Self {
        Self {
            is_available: false,
            ..Self::exception(date, 0, MINUTES_PER_DAY - 1)
        }
    }
}

/// A bookable unit of time considered during availability computation.
/// Ephemeral: computed per query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start_minute: u16,
    pub end_minute: u16,
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Statuses that occupy the tutor's calendar.
    pub fn blocks_calendar(self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled | Self::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// A committed tutoring session. `tutor_id` is the tutor-profile identifier,
/// the key availability and pricing are stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedSession {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u16,
    pub status: SessionStatus,
    pub price_cents: i64,
    pub notes: String,
    pub meeting_link: Option<String>,
}

impl BookedSession {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: Uuid,
    pub display_name: String,
    pub hourly_rate_cents: i64,
    pub active: bool,
    pub subject_ids: Vec<Uuid>,
}
