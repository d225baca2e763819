use tracing::info;
use uuid::Uuid;

use crate::types::BookedSession;

/// Outbound notification seam. Delivery (push, e-mail) lives in an external
/// service; the core only hands over the event. Failures are logged by the
/// caller and never affect the booking result.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationDispatcher: Send + Sync + 'static {
    fn notify_tutor_of_booking_request(
        &self,
        tutor_id: Uuid,
        session: &BookedSession,
    ) -> Result<(), String>;
}

/// Default dispatcher: records the event in the service log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl NotificationDispatcher for LoggingNotifier {
    fn notify_tutor_of_booking_request(
        &self,
        tutor_id: Uuid,
        session: &BookedSession,
    ) -> Result<(), String> {
        info!(
            %tutor_id,
            session_id = %session.id,
            scheduled_at = %session.scheduled_at,
            duration_minutes = session.duration_minutes,
            "new booking request for tutor"
        );
        Ok(())
    }
}
