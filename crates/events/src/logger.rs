//! Structured-log sink for attendance events.
//!
//! [`EventLogger`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes one `tracing` record per event, carrying its JSON form. It runs as
//! a background task and stops when the bus is dropped.

use tokio::sync::broadcast;

use crate::attendance::AttendanceEvent;

pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop until the channel closes.
    pub async fn run(mut receiver: broadcast::Receiver<AttendanceEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::log(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
    }

    fn log(event: &AttendanceEvent) {
        match serde_json::to_string(event) {
            Ok(body) => tracing::info!(
                event = event.name(),
                user_id = event.user_id,
                record_id = ?event.record_id(),
                %body,
                "Attendance event"
            ),
            Err(e) => tracing::warn!(
                event = event.name(),
                user_id = event.user_id,
                error = %e,
                "Failed to serialize attendance event"
            ),
        }
    }
}
