//! Duty session lifecycle.
//!
//! A session moves `active -> completed` exactly once. A day's session list is
//! append-only and holds at most one `active` entry; [`start_session`] and
//! [`end_session`] are the only mutators and both leave the list untouched
//! when they reject.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::aggregate::round2;
use super::error::AttendanceError;
use super::location::LocationSnapshot;
use crate::types::Timestamp;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// One contiguous on-duty interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutySession {
    pub start_time: Timestamp,
    pub start_location: LocationSnapshot,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub end_location: Option<LocationSnapshot>,
    /// Hours, rounded to 2 decimals. Set only on completion.
    #[serde(default)]
    pub duration: Option<f64>,
    pub status: SessionStatus,
}

impl DutySession {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// The toggle a client requests on `POST /attendance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    End,
}

impl SessionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionAction::Start => "start",
            SessionAction::End => "end",
        }
    }
}

impl FromStr for SessionAction {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(SessionAction::Start),
            "end" => Ok(SessionAction::End),
            other => Err(AttendanceError::Validation(format!(
                "Invalid action '{other}'. Must be one of: start, end"
            ))),
        }
    }
}

/// The currently open session, if any.
pub fn active_session(sessions: &[DutySession]) -> Option<&DutySession> {
    sessions.iter().find(|s| s.is_active())
}

/// Elapsed hours between two instants, rounded to 2 decimals.
///
/// Negative spans (device clock behind the server) clamp to zero.
pub fn session_duration_hours(start: Timestamp, end: Timestamp) -> f64 {
    let millis = (end - start).num_milliseconds().max(0) as f64;
    round2(millis / MILLIS_PER_HOUR)
}

/// Open a new session at `now`.
///
/// Rejects with [`AttendanceError::ActiveSessionExists`] carrying the open
/// session so the caller can show it without another round trip.
pub fn start_session(
    sessions: &mut Vec<DutySession>,
    location: LocationSnapshot,
    now: Timestamp,
) -> Result<DutySession, AttendanceError> {
    if let Some(open) = active_session(sessions) {
        return Err(AttendanceError::ActiveSessionExists {
            session: Box::new(open.clone()),
        });
    }

    let session = DutySession {
        start_time: now,
        start_location: location,
        end_time: None,
        end_location: None,
        duration: None,
        status: SessionStatus::Active,
    };
    sessions.push(session.clone());
    Ok(session)
}

/// Close the open session at `now`.
pub fn end_session(
    sessions: &mut [DutySession],
    location: LocationSnapshot,
    now: Timestamp,
) -> Result<DutySession, AttendanceError> {
    let open = sessions
        .iter_mut()
        .find(|s| s.is_active())
        .ok_or(AttendanceError::NoActiveSession)?;

    open.end_time = Some(now);
    open.end_location = Some(location);
    open.duration = Some(session_duration_hours(open.start_time, now));
    open.status = SessionStatus::Completed;
    Ok(open.clone())
}
