//! Attendance events published after a committed duty change.
//!
//! Each event serializes to a flat JSON object tagged by `type`, e.g.
//! `{"type":"attendance.duty_started","userId":5,"recordId":9,...}`, which is
//! the shape downstream notifiers consume.

use fieldcrm_core::attendance::DutySession;
use fieldcrm_core::types::{DbId, Timestamp};
use serde::Serialize;

pub const EVENT_DUTY_STARTED: &str = "attendance.duty_started";
pub const EVENT_DUTY_ENDED: &str = "attendance.duty_ended";
/// The cached duty flag disagreed with the session history and was rewritten.
pub const EVENT_STATUS_CORRECTED: &str = "attendance.status_corrected";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// The user whose duty state changed.
    pub user_id: DbId,
    pub occurred_at: Timestamp,
    #[serde(flatten)]
    pub kind: AttendanceEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AttendanceEventKind {
    #[serde(rename = "attendance.duty_started", rename_all = "camelCase")]
    DutyStarted {
        record_id: DbId,
        start_time: Timestamp,
        address: String,
    },

    #[serde(rename = "attendance.duty_ended", rename_all = "camelCase")]
    DutyEnded {
        record_id: DbId,
        start_time: Timestamp,
        end_time: Option<Timestamp>,
        /// Rounded session length in hours.
        duration: Option<f64>,
    },

    #[serde(rename = "attendance.status_corrected")]
    StatusCorrected { previous: bool, current: bool },
}

impl AttendanceEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DutyStarted { .. } => EVENT_DUTY_STARTED,
            Self::DutyEnded { .. } => EVENT_DUTY_ENDED,
            Self::StatusCorrected { .. } => EVENT_STATUS_CORRECTED,
        }
    }
}

impl AttendanceEvent {
    fn new(user_id: DbId, kind: AttendanceEventKind) -> Self {
        Self {
            user_id,
            occurred_at: chrono::Utc::now(),
            kind,
        }
    }

    /// `session` was opened on attendance record `record_id`.
    pub fn duty_started(user_id: DbId, record_id: DbId, session: &DutySession) -> Self {
        Self::new(
            user_id,
            AttendanceEventKind::DutyStarted {
                record_id,
                start_time: session.start_time,
                address: session.start_location.address.clone(),
            },
        )
    }

    /// `session` was closed on attendance record `record_id`.
    pub fn duty_ended(user_id: DbId, record_id: DbId, session: &DutySession) -> Self {
        Self::new(
            user_id,
            AttendanceEventKind::DutyEnded {
                record_id,
                start_time: session.start_time,
                end_time: session.end_time,
                duration: session.duration,
            },
        )
    }

    /// Reconciliation overwrote a stale duty flag.
    pub fn status_corrected(user_id: DbId, previous: bool, current: bool) -> Self {
        Self::new(
            user_id,
            AttendanceEventKind::StatusCorrected { previous, current },
        )
    }

    /// Dot-separated event name, identical to the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The attendance record the event concerns, if any.
    pub fn record_id(&self) -> Option<DbId> {
        match self.kind {
            AttendanceEventKind::DutyStarted { record_id, .. }
            | AttendanceEventKind::DutyEnded { record_id, .. } => Some(record_id),
            AttendanceEventKind::StatusCorrected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use fieldcrm_core::attendance::location::LocationSnapshot;
    use fieldcrm_core::attendance::SessionStatus;

    use super::*;

    fn session() -> DutySession {
        let t = chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        DutySession {
            start_time: t,
            start_location: LocationSnapshot {
                latitude: 1.0,
                longitude: 2.0,
                address: "Depot".to_string(),
                city: None,
                state: None,
                pincode: None,
                address_components: None,
                capture_method: "gps".to_string(),
                confidence: 0.8,
                validation_status: "unverified".to_string(),
                timestamp: t,
            },
            end_time: None,
            end_location: None,
            duration: None,
            status: SessionStatus::Active,
        }
    }

    #[test]
    fn duty_started_carries_record_and_user() {
        let event = AttendanceEvent::duty_started(5, 99, &session());
        assert_eq!(event.name(), EVENT_DUTY_STARTED);
        assert_eq!(event.user_id, 5);
        assert_eq!(event.record_id(), Some(99));
    }

    #[test]
    fn duty_ended_copies_the_closed_session() {
        let mut closed = session();
        let end = closed.start_time + chrono::Duration::minutes(90);
        closed.end_time = Some(end);
        closed.duration = Some(1.5);
        closed.status = SessionStatus::Completed;

        let event = AttendanceEvent::duty_ended(5, 99, &closed);
        assert_eq!(event.name(), EVENT_DUTY_ENDED);
        assert_eq!(
            event.kind,
            AttendanceEventKind::DutyEnded {
                record_id: 99,
                start_time: closed.start_time,
                end_time: Some(end),
                duration: Some(1.5),
            }
        );
    }

    #[test]
    fn status_corrected_has_no_record() {
        let event = AttendanceEvent::status_corrected(5, true, false);
        assert_eq!(event.name(), EVENT_STATUS_CORRECTED);
        assert_eq!(event.record_id(), None);
    }

    #[test]
    fn serializes_flat_with_type_tag() {
        let json = serde_json::to_value(AttendanceEvent::duty_started(5, 99, &session())).unwrap();
        assert_eq!(json["type"], EVENT_DUTY_STARTED);
        assert_eq!(json["userId"], 5);
        assert_eq!(json["recordId"], 99);
        assert_eq!(json["startTime"], "2026-03-02T09:00:00Z");
        assert_eq!(json["address"], "Depot");
        assert!(json.get("occurredAt").is_some());

        let json = serde_json::to_value(AttendanceEvent::status_corrected(5, true, false)).unwrap();
        assert_eq!(json["type"], EVENT_STATUS_CORRECTED);
        assert_eq!(json["previous"], true);
        assert_eq!(json["current"], false);
    }
}
