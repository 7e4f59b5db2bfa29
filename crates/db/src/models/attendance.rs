//! Daily attendance entity model, DTOs and transition results.

use chrono::NaiveDate;
use fieldcrm_core::attendance::legacy::{legacy_view, LegacyAttendanceView};
use fieldcrm_core::attendance::reconcile::{has_drifted, DutyStatusSnapshot};
use fieldcrm_core::attendance::{AttendanceError, DutySession, DutyStatus};
use fieldcrm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// DailyAttendance
// ---------------------------------------------------------------------------

/// A row from the `daily_attendance` table.
#[derive(Debug, Clone, FromRow)]
pub struct DailyAttendance {
    pub id: DbId,
    pub user_id: DbId,
    pub attendance_date: NaiveDate,
    pub duty_sessions: Json<Vec<DutySession>>,
    pub total_hours: f64,
    pub total_distance: f64,
    pub status: String,
    pub check_ins: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyAttendance {
    pub fn sessions(&self) -> &[DutySession] {
        &self.duty_sessions.0
    }

    pub fn duty_status(&self) -> DutyStatus {
        DutyStatus::from_db_str(&self.status)
    }
}

/// API representation of a day's attendance, including the derived
/// single check-in/check-out view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendanceResponse {
    pub id: DbId,
    pub user: DbId,
    pub date: NaiveDate,
    pub duty_sessions: Vec<DutySession>,
    pub total_hours: f64,
    pub total_distance: f64,
    pub status: DutyStatus,
    pub check_ins: Vec<DbId>,
    pub legacy: LegacyAttendanceView,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DailyAttendance> for DailyAttendanceResponse {
    fn from(row: DailyAttendance) -> Self {
        let status = row.duty_status();
        let legacy = legacy_view(row.sessions());
        Self {
            id: row.id,
            user: row.user_id,
            date: row.attendance_date,
            duty_sessions: row.duty_sessions.0,
            total_hours: row.total_hours,
            total_distance: row.total_distance,
            status,
            check_ins: row.check_ins,
            legacy,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filter for listing and summarising attendance rows.
///
/// `None` fields do not constrain the query.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub user_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Why a start/end transition did not commit.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// The state machine refused the transition. Nothing was written.
    #[error(transparent)]
    Rejected(#[from] AttendanceError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A committed start/end transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The record as persisted, totals already recomputed.
    pub record: DailyAttendance,
    /// The session that was opened or closed.
    pub session: DutySession,
}

/// Result of recomputing and rewriting a user's cached duty flag.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub snapshot: DutyStatusSnapshot,
    /// Today's record id, if one exists.
    pub record_id: Option<DbId>,
    /// The cached flag before it was overwritten.
    pub previous_duty_status: bool,
}

impl Reconciliation {
    /// Whether the cached flag was wrong and has now been corrected.
    pub fn corrected(&self) -> bool {
        has_drifted(self.previous_duty_status, &self.snapshot)
    }
}
