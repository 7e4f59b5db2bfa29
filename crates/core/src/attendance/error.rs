use super::session::DutySession;

/// Rejections raised by the attendance engine.
///
/// None of these are server faults: the API layer reports all of them as
/// client errors so the mobile app can resynchronise its UI from the body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttendanceError {
    /// Malformed location, unknown action, or a bad query parameter.
    #[error("{0}")]
    Validation(String),

    /// `start` while a session is already open. Carries the open session.
    #[error("A duty session is already active since {}", .session.start_time.to_rfc3339())]
    ActiveSessionExists { session: Box<DutySession> },

    /// `end` while nothing is open.
    #[error("No active duty session to end")]
    NoActiveSession,
}
