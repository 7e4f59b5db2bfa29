//! Repository for the `daily_attendance` table.
//!
//! Start/end transitions run inside one transaction that holds the row lock
//! on the (user, day) record from read to commit. Two concurrent starts for
//! the same user and day therefore serialize: the second one sees the first
//! one's active session and is rejected.

use chrono::NaiveDate;
use fieldcrm_core::attendance::reconcile::derive_status;
use fieldcrm_core::attendance::stats::DayFigures;
use fieldcrm_core::attendance::{
    end_session, recompute_totals, start_session, AttendanceError, DutySession, DutyStatus,
    LocationSnapshot,
};
use fieldcrm_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::attendance::{
    AttendanceFilter, DailyAttendance, Reconciliation, TransitionError, TransitionOutcome,
};
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, attendance_date, duty_sessions, total_hours, total_distance, \
                       status, check_ins, created_at, updated_at";

/// Optional-filter predicate shared by list, count and stats queries.
/// Binds: `$1` user id, `$2` start date, `$3` end date.
const FILTER: &str = "($1::BIGINT IS NULL OR user_id = $1) \
                      AND ($2::DATE IS NULL OR attendance_date >= $2) \
                      AND ($3::DATE IS NULL OR attendance_date <= $3)";

pub struct AttendanceRepo;

impl AttendanceRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a record by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DailyAttendance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM daily_attendance WHERE id = $1");
        sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's record for one attendance day.
    pub async fn find_for_day(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<DailyAttendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_attendance
             WHERE user_id = $1 AND attendance_date = $2"
        );
        sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(user_id)
            .bind(day)
            .fetch_optional(pool)
            .await
    }

    /// List records matching `filter`, newest day first.
    pub async fn list(
        pool: &PgPool,
        filter: &AttendanceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DailyAttendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_attendance
             WHERE {FILTER}
             ORDER BY attendance_date DESC, user_id ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(filter.user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count records matching `filter`.
    pub async fn count(pool: &PgPool, filter: &AttendanceFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM daily_attendance WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Per-day hours, distance and session counts for the range statistics.
    pub async fn day_figures(
        pool: &PgPool,
        filter: &AttendanceFilter,
    ) -> Result<Vec<DayFigures>, sqlx::Error> {
        let query = format!(
            "SELECT total_hours, total_distance, jsonb_array_length(duty_sessions)
             FROM daily_attendance
             WHERE {FILTER}"
        );
        let rows: Vec<(f64, f64, i32)> = sqlx::query_as(&query)
            .bind(filter.user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(total_hours, total_distance, sessions)| DayFigures {
                total_hours,
                total_distance,
                session_count: usize::try_from(sessions).unwrap_or(0),
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Session transitions
    // -----------------------------------------------------------------------

    /// Open a duty session on the user's record for `day`, creating the
    /// record if this is the first start of the day.
    pub async fn start_session(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
        location: LocationSnapshot,
        now: Timestamp,
    ) -> Result<TransitionOutcome, TransitionError> {
        Self::transition(pool, user_id, day, true, |sessions| {
            start_session(sessions, location, now)
        })
        .await
    }

    /// Close the open duty session on the user's record for `day`.
    pub async fn end_session(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
        location: LocationSnapshot,
        now: Timestamp,
    ) -> Result<TransitionOutcome, TransitionError> {
        Self::transition(pool, user_id, day, false, |sessions| {
            end_session(sessions, location, now)
        })
        .await
    }

    /// Lock, mutate, recompute and persist in one transaction.
    ///
    /// A rejected transition returns before any write and the transaction
    /// rolls back on drop. The user's cached duty flag is rewritten in the
    /// same transaction so it never disagrees with the committed sessions.
    async fn transition<F>(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
        create_if_missing: bool,
        apply: F,
    ) -> Result<TransitionOutcome, TransitionError>
    where
        F: FnOnce(&mut Vec<DutySession>) -> Result<DutySession, AttendanceError>,
    {
        let mut tx = pool.begin().await?;

        if create_if_missing {
            sqlx::query(
                "INSERT INTO daily_attendance (user_id, attendance_date)
                 VALUES ($1, $2)
                 ON CONFLICT (user_id, attendance_date) DO NOTHING",
            )
            .bind(user_id)
            .bind(day)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM daily_attendance
             WHERE user_id = $1 AND attendance_date = $2
             FOR UPDATE"
        );
        let record = sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(user_id)
            .bind(day)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AttendanceError::NoActiveSession)?;

        let mut sessions = record.duty_sessions.0;
        let session = apply(&mut sessions)?;
        let totals = recompute_totals(&sessions);

        let query = format!(
            "UPDATE daily_attendance
             SET duty_sessions = $2, total_hours = $3, status = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(record.id)
            .bind(Json(&sessions))
            .bind(totals.total_hours)
            .bind(totals.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        UserRepo::set_duty_status(&mut *tx, user_id, totals.status == DutyStatus::OnDuty).await?;

        tx.commit().await?;

        tracing::debug!(
            user_id,
            record_id = record.id,
            %day,
            sessions = sessions.len(),
            total_hours = totals.total_hours,
            status = totals.status.as_str(),
            "Attendance transition committed"
        );

        Ok(TransitionOutcome { record, session })
    }

    // -----------------------------------------------------------------------
    // Status reconciliation
    // -----------------------------------------------------------------------

    /// Recompute the user's duty flag from the `day` record and overwrite the
    /// cached value.
    ///
    /// Locks the user row first so a transition committing concurrently
    /// cannot be overwritten with a stale value. Returns `Ok(None)` if the
    /// user does not exist.
    pub async fn reconcile(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<Reconciliation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(previous_duty_status) = UserRepo::lock_duty_status(&mut *tx, user_id).await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {COLUMNS} FROM daily_attendance
             WHERE user_id = $1 AND attendance_date = $2"
        );
        let record = sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(user_id)
            .bind(day)
            .fetch_optional(&mut *tx)
            .await?;

        let snapshot = derive_status(record.as_ref().map(DailyAttendance::sessions));

        UserRepo::set_duty_status(&mut *tx, user_id, snapshot.is_on_duty).await?;
        tx.commit().await?;

        Ok(Some(Reconciliation {
            snapshot,
            record_id: record.map(|r| r.id),
            previous_duty_status,
        }))
    }

    // -----------------------------------------------------------------------
    // Check-ins
    // -----------------------------------------------------------------------

    /// Attach a completed customer check-in to the user's `day` record and add
    /// its travel distance to `total_distance`.
    ///
    /// Idempotent per `check_in_id`. Returns `None` if there is no record for
    /// the day or the check-in was already attached.
    pub async fn record_check_in(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
        check_in_id: DbId,
        distance_km: f64,
    ) -> Result<Option<DailyAttendance>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_attendance
             SET check_ins = array_append(check_ins, $3),
                 total_distance = total_distance + $4
             WHERE user_id = $1 AND attendance_date = $2
               AND NOT ($3 = ANY(check_ins))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyAttendance>(&query)
            .bind(user_id)
            .bind(day)
            .bind(check_in_id)
            .bind(distance_km.max(0.0))
            .fetch_optional(pool)
            .await
    }
}
