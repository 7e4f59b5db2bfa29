//! Fan-out of [`AttendanceEvent`]s to in-process subscribers.
//!
//! The bus lives in application state as `Arc<EventBus>`. Handlers publish
//! only after their transaction has committed, so a subscriber never sees a
//! change that was rolled back.

use tokio::sync::broadcast;

use crate::attendance::AttendanceEvent;

/// Events a slow subscriber may fall behind by before it starts lagging.
const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<AttendanceEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver `event` to every current subscriber and return how many
    /// received it. With no subscribers the event is dropped.
    pub fn publish(&self, event: AttendanceEvent) -> usize {
        let name = event.name();
        let user_id = event.user_id;
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(event = name, user_id, "No subscribers for attendance event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AttendanceEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
