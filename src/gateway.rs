use chrono::NaiveDate;
use uuid::Uuid;

use crate::availability::WeeklyAvailability;
use crate::error::GatewayError;
use crate::types::{BookedSession, TutorProfile};

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created(BookedSession),
    /// Another session already occupies an overlapping interval; nothing was
    /// written.
    Conflict,
}

/// Storage seam of the booking core. Tutor profiles and availability are
/// read-only here; sessions are written through
/// `insert_session_if_no_conflict` only.
pub trait PersistenceGateway: Clone + Send + Sync + 'static {
    fn get_tutor(&self, tutor_id: Uuid) -> Result<Option<TutorProfile>, GatewayError>;

    fn get_availability(&self, tutor_id: Uuid) -> Result<WeeklyAvailability, GatewayError>;

    /// Sessions of `tutor_id` scheduled on `date`, cancelled ones excluded,
    /// ordered by start.
    fn sessions_on_date(
        &self,
        tutor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedSession>, GatewayError>;

    /// Atomic with respect to its own conflict re-check: two racing inserts
    /// for overlapping intervals on one tutor cannot both report `Created`.
    fn insert_session_if_no_conflict(
        &self,
        session: BookedSession,
    ) -> Result<InsertOutcome, GatewayError>;
}
