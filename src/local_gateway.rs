use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::availability::WeeklyAvailability;
use crate::conflicts::intervals_overlap;
use crate::error::GatewayError;
use crate::gateway::{InsertOutcome, PersistenceGateway};
use crate::types::{
    parse_minute_of_day, AvailabilityWindow, BookedSession, SessionStatus, TutorProfile,
};

/// In-memory gateway for local development and tests. Holding the store
/// mutex across the conflict re-check and the insert makes
/// `insert_session_if_no_conflict` atomic.
#[derive(Debug, Clone, Default)]
pub struct LocalGateway {
    store: Arc<Mutex<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    tutors: HashMap<Uuid, TutorProfile>,
    availability: HashMap<Uuid, WeeklyAvailability>,
    sessions: HashMap<Uuid, BookedSession>,
}

impl LocalGateway {
    pub fn add_tutor(&self, tutor: TutorProfile, availability: WeeklyAvailability) {
        let mut store = self.store.lock().unwrap();
        store.availability.insert(tutor.id, availability);
        store.tutors.insert(tutor.id, tutor);
    }

    /// Seeds one tutor with weekday-morning availability so a fresh local
    /// run serves meaningful slots. Ids are logged for manual requests.
    pub fn insert_example_tutors(&self) {
        let tutor = TutorProfile {
            id: Uuid::new_v4(),
            display_name: "Example Tutor".into(),
            hourly_rate_cents: 4500,
            active: true,
            subject_ids: vec![Uuid::new_v4()],
        };
        // Monday through Friday, 09:00-17:00.
        let open = parse_minute_of_day("09:00").unwrap();
        let close = parse_minute_of_day("17:00").unwrap();
        let windows: Vec<AvailabilityWindow> = (1..=5)
            .map(|weekday| AvailabilityWindow::recurring(weekday, open, close))
            .collect();
        let availability = WeeklyAvailability { windows };

        info!(
            tutor_id = %tutor.id,
            subject_id = %tutor.subject_ids[0],
            "inserted example tutor"
        );
        self.add_tutor(tutor, availability);
    }
}

impl PersistenceGateway for LocalGateway {
    fn get_tutor(&self, tutor_id: Uuid) -> Result<Option<TutorProfile>, GatewayError> {
        Ok(self.store.lock().unwrap().tutors.get(&tutor_id).cloned())
    }

    fn get_availability(&self, tutor_id: Uuid) -> Result<WeeklyAvailability, GatewayError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .availability
            .get(&tutor_id)
            .cloned()
            .unwrap_or_default())
    }

    fn sessions_on_date(
        &self,
        tutor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedSession>, GatewayError> {
        let store = self.store.lock().unwrap();
        let mut sessions: Vec<BookedSession> = store
            .sessions
            .values()
            .filter(|session| {
                session.tutor_id == tutor_id
                    && session.scheduled_at.date_naive() == date
                    && session.status != SessionStatus::Cancelled
            })
            .cloned()
            .collect();
        sessions.sort_unstable_by_key(|session| session.scheduled_at);
        Ok(sessions)
    }

    fn insert_session_if_no_conflict(
        &self,
        session: BookedSession,
    ) -> Result<InsertOutcome, GatewayError> {
        let mut store = self.store.lock().unwrap();

        let clashing = store.sessions.values().any(|existing| {
            existing.tutor_id == session.tutor_id
                && existing.status.blocks_calendar()
                && intervals_overlap(
                    session.scheduled_at,
                    session.ends_at(),
                    existing.scheduled_at,
                    existing.ends_at(),
                )
        });
        if clashing {
            return Ok(InsertOutcome::Conflict);
        }

        store.sessions.insert(session.id, session.clone());
        Ok(InsertOutcome::Created(session))
    }
}
