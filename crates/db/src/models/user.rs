//! User projection model.
//!
//! Accounts are owned by the identity service; this table mirrors the fields
//! the attendance engine needs.

use fieldcrm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Cached "on duty" flag. Derived data; see `AttendanceRepo::reconcile`.
    pub duty_status: bool,
    /// Declared offset from UTC used for attendance-day bucketing.
    pub utc_offset_minutes: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for mirroring a user into this service.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub utc_offset_minutes: Option<i32>,
}
