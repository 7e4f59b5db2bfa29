//! Single check-in/check-out view for clients that predate multi-session days.
//!
//! Nothing here is stored. The view is projected from the session list on
//! every read, so it cannot disagree with it.

use serde::Serialize;

use super::location::LocationSnapshot;
use super::session::{DutySession, SessionStatus};
use crate::types::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAttendanceView {
    pub check_in_time: Option<Timestamp>,
    pub check_in_location: Option<LocationSnapshot>,
    pub check_out_time: Option<Timestamp>,
    pub check_out_location: Option<LocationSnapshot>,
}

/// Check-in is the day's first start; check-out is the last session's end,
/// present only while that session is completed.
pub fn legacy_view(sessions: &[DutySession]) -> LegacyAttendanceView {
    let first = sessions.first();
    let closed_last = sessions
        .last()
        .filter(|s| s.status == SessionStatus::Completed);

    LegacyAttendanceView {
        check_in_time: first.map(|s| s.start_time),
        check_in_location: first.map(|s| s.start_location.clone()),
        check_out_time: closed_last.and_then(|s| s.end_time),
        check_out_location: closed_last.and_then(|s| s.end_location.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::session::tests::{at, loc};
    use crate::attendance::session::{end_session, start_session};

    #[test]
    fn empty_day_has_no_legacy_fields() {
        assert_eq!(legacy_view(&[]), LegacyAttendanceView::default());
    }

    #[test]
    fn open_day_has_check_in_only() {
        let mut sessions = Vec::new();
        start_session(&mut sessions, loc("Office"), at(9, 0)).unwrap();
        let view = legacy_view(&sessions);
        assert_eq!(view.check_in_time, Some(at(9, 0)));
        assert_eq!(view.check_in_location.map(|l| l.address), Some("Office".to_string()));
        assert!(view.check_out_time.is_none());
    }

    #[test]
    fn check_out_tracks_latest_completed_session() {
        let mut sessions = Vec::new();
        start_session(&mut sessions, loc("A"), at(9, 0)).unwrap();
        end_session(&mut sessions, loc("B"), at(12, 0)).unwrap();
        start_session(&mut sessions, loc("C"), at(13, 0)).unwrap();
        end_session(&mut sessions, loc("D"), at(18, 0)).unwrap();

        let view = legacy_view(&sessions);
        assert_eq!(view.check_in_time, Some(at(9, 0)));
        assert_eq!(view.check_out_time, Some(at(18, 0)));
        assert_eq!(view.check_out_location.map(|l| l.address), Some("D".to_string()));
    }

    #[test]
    fn restarting_clears_check_out() {
        let mut sessions = Vec::new();
        start_session(&mut sessions, loc("A"), at(9, 0)).unwrap();
        end_session(&mut sessions, loc("B"), at(12, 0)).unwrap();
        start_session(&mut sessions, loc("C"), at(13, 0)).unwrap();
        assert!(legacy_view(&sessions).check_out_time.is_none());
    }
}
