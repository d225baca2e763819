use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::availability::WeeklyAvailability;
use crate::conflicts::minute_on_date;
use crate::error::GatewayError;
use crate::gateway::{InsertOutcome, PersistenceGateway};
use crate::notifier::NotificationDispatcher;
use crate::types::{AvailabilityWindow, BookedSession, SessionStatus, TutorProfile};

// 2024-05-06 is a Monday; most fixtures book against it.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

pub fn nine_to_noon_mondays() -> WeeklyAvailability {
    WeeklyAvailability::new(vec![AvailabilityWindow::recurring(1, 540, 720)]).unwrap()
}

pub fn example_tutor() -> TutorProfile {
    TutorProfile {
        id: Uuid::new_v4(),
        display_name: "Ada Lovelace".into(),
        hourly_rate_cents: 6000,
        active: true,
        subject_ids: vec![Uuid::new_v4()],
    }
}

pub fn session_at(
    date: NaiveDate,
    start_minute: u16,
    duration_minutes: u16,
    status: SessionStatus,
) -> BookedSession {
    BookedSession {
        id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        tutor_id: Uuid::new_v4(),
        subject_id: Uuid::new_v4(),
        scheduled_at: minute_on_date(date, start_minute),
        duration_minutes,
        status,
        price_cents: 6000,
        notes: String::new(),
        meeting_link: None,
    }
}

#[derive(Default)]
pub struct MockGatewayInner {
    pub calls_to_get_tutor: AtomicU64,
    pub calls_to_get_availability: AtomicU64,
    pub calls_to_sessions_on_date: AtomicU64,
    pub calls_to_insert_session: AtomicU64,
    /// Number of upcoming insert calls that fail with a transient storage
    /// error before behaving normally again.
    pub insert_failures_to_inject: AtomicU64,
    /// When set, every insert reports a lost race without writing.
    pub force_insert_conflict: AtomicBool,
    pub tutors: Mutex<HashMap<Uuid, TutorProfile>>,
    pub availability: Mutex<HashMap<Uuid, WeeklyAvailability>>,
    pub sessions: Mutex<Vec<BookedSession>>,
}

#[derive(Clone, Default)]
pub struct MockGateway(pub Arc<MockGatewayInner>);

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tutor(
        &self,
        hourly_rate_cents: i64,
        availability: WeeklyAvailability,
    ) -> TutorProfile {
        let tutor = TutorProfile {
            hourly_rate_cents,
            ..example_tutor()
        };
        self.0
            .availability
            .lock()
            .unwrap()
            .insert(tutor.id, availability);
        self.0.tutors.lock().unwrap().insert(tutor.id, tutor.clone());
        tutor
    }

    pub fn add_inactive_tutor(&self) -> Uuid {
        let tutor = TutorProfile {
            active: false,
            ..example_tutor()
        };
        let tutor_id = tutor.id;
        self.0.tutors.lock().unwrap().insert(tutor_id, tutor);
        tutor_id
    }
}

impl PersistenceGateway for MockGateway {
    fn get_tutor(&self, tutor_id: Uuid) -> Result<Option<TutorProfile>, GatewayError> {
        self.0.calls_to_get_tutor.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.tutors.lock().unwrap().get(&tutor_id).cloned())
    }

    fn get_availability(&self, tutor_id: Uuid) -> Result<WeeklyAvailability, GatewayError> {
        self.0
            .calls_to_get_availability
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .availability
            .lock()
            .unwrap()
            .get(&tutor_id)
            .cloned()
            .unwrap_or_default())
    }

    fn sessions_on_date(
        &self,
        tutor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedSession>, GatewayError> {
        self.0
            .calls_to_sessions_on_date
            .fetch_add(1, Ordering::SeqCst);
        let mut sessions: Vec<BookedSession> = self
            .0
            .sessions
            .lock()
            .unwrap()
            .iter()
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
        self.0
            .calls_to_insert_session
            .fetch_add(1, Ordering::SeqCst);
        if self.0.insert_failures_to_inject.load(Ordering::SeqCst) > 0 {
            self.0
                .insert_failures_to_inject
                .fetch_sub(1, Ordering::SeqCst);
            return Err(GatewayError("injected storage failure".into()));
        }
        if self.0.force_insert_conflict.load(Ordering::SeqCst) {
            return Ok(InsertOutcome::Conflict);
        }
        self.0.sessions.lock().unwrap().push(session.clone());
        Ok(InsertOutcome::Created(session))
    }
}

#[derive(Default)]
pub struct CountingNotifierInner {
    pub calls: AtomicU64,
    pub fail: AtomicBool,
}

#[derive(Clone, Default)]
pub struct CountingNotifier(pub Arc<CountingNotifierInner>);

impl NotificationDispatcher for CountingNotifier {
    fn notify_tutor_of_booking_request(
        &self,
        _tutor_id: Uuid,
        _session: &BookedSession,
    ) -> Result<(), String> {
        self.0.calls.fetch_add(1, Ordering::SeqCst);
        match self.0.fail.load(Ordering::SeqCst) {
            false => Ok(()),
            true => Err("supposed to fail".into()),
        }
    }
}
