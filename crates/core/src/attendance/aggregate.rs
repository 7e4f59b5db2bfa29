//! Daily totals derived from the session list.
//!
//! Recomputed from scratch on every persist so the stored totals can never
//! drift from the sessions they summarise. `total_distance` is not derived
//! here; check-in completion owns it.

use serde::{Deserialize, Serialize};

use super::session::{DutySession, SessionStatus};

/// Overall duty state of a day's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatus {
    OnDuty,
    OffDuty,
}

impl DutyStatus {
    /// Value stored in `daily_attendance.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            DutyStatus::OnDuty => "on-duty",
            DutyStatus::OffDuty => "off-duty",
        }
    }

    /// Parse a stored status. Unknown values read as off duty.
    pub fn from_db_str(s: &str) -> Self {
        if s == "on-duty" {
            DutyStatus::OnDuty
        } else {
            DutyStatus::OffDuty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotals {
    pub status: DutyStatus,
    pub total_hours: f64,
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recompute a day's status and hours from its sessions.
///
/// Each completed session's `duration` is already rounded; the sum is rounded
/// once more as a whole. Keep that order: clients compare these numbers.
pub fn recompute_totals(sessions: &[DutySession]) -> DailyTotals {
    let status = if sessions.iter().any(DutySession::is_active) {
        DutyStatus::OnDuty
    } else {
        DutyStatus::OffDuty
    };

    let sum: f64 = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .filter_map(|s| s.duration)
        .sum();

    DailyTotals {
        status,
        total_hours: round2(sum),
    }
}
