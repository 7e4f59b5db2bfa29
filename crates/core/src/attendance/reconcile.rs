//! Duty status derivation.
//!
//! The cached `users.duty_status` flag is never trusted. Every status read
//! and every explicit sync recomputes it from today's sessions and then
//! overwrites the cache.

use serde::Serialize;

use super::aggregate::recompute_totals;
use super::session::{active_session, DutySession};

/// What `GET /attendance/status` and `POST /attendance/sync-status` report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyStatusSnapshot {
    pub is_on_duty: bool,
    pub total_sessions: usize,
    pub total_hours: f64,
    pub current_session: Option<DutySession>,
    pub all_sessions: Vec<DutySession>,
}

impl DutyStatusSnapshot {
    /// Snapshot for a day with no attendance record.
    pub fn off_duty() -> Self {
        Self {
            is_on_duty: false,
            total_sessions: 0,
            total_hours: 0.0,
            current_session: None,
            all_sessions: Vec::new(),
        }
    }
}

/// Derive today's snapshot. `None` means no record exists yet.
pub fn derive_status(sessions: Option<&[DutySession]>) -> DutyStatusSnapshot {
    let Some(sessions) = sessions else {
        return DutyStatusSnapshot::off_duty();
    };

    let current = active_session(sessions).cloned();
    DutyStatusSnapshot {
        is_on_duty: current.is_some(),
        total_sessions: sessions.len(),
        total_hours: recompute_totals(sessions).total_hours,
        current_session: current,
        all_sessions: sessions.to_vec(),
    }
}

/// Whether the cached flag disagrees with the derived snapshot.
pub fn has_drifted(cached_duty_status: bool, snapshot: &DutyStatusSnapshot) -> bool {
    cached_duty_status != snapshot.is_on_duty
}
