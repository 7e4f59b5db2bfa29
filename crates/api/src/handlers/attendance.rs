//! Handlers for the `/attendance` resource.
//!
//! Start/end toggles, today's duty status (with cache reconciliation),
//! history listing, range statistics, check-in travel and a distance utility.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use fieldcrm_core::attendance::day::{attendance_day, resolve_offset};
use fieldcrm_core::attendance::distance::distance_between;
use fieldcrm_core::attendance::location::{validate_coordinates, Coordinates};
use fieldcrm_core::attendance::stats::{overview, AttendanceOverview};
use fieldcrm_core::attendance::{
    validate_location, AttendanceError, DutySession, DutyStatusSnapshot, LocationPayload,
    SessionAction,
};
use fieldcrm_core::error::CoreError;
use fieldcrm_core::pagination::{page_offset, total_pages};
use fieldcrm_core::types::{DbId, Timestamp};
use fieldcrm_db::models::attendance::{DailyAttendanceResponse, Reconciliation};
use fieldcrm_db::models::user::User;
use fieldcrm_db::repositories::{AttendanceRepo, UserRepo};
use fieldcrm_events::AttendanceEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::query::{build_filter, AttendanceListParams, DistanceParams, StatsParams};
use crate::response::{DataResponse, PageResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /attendance`.
///
/// Both fields are optional at the wire level so that omissions are reported
/// as `VALIDATION_ERROR` rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub action: Option<String>,
    pub location: Option<LocationPayload>,
}

/// Result of a committed start/end toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub action: &'static str,
    /// The session that was opened or closed.
    pub session: DutySession,
    pub attendance: DailyAttendanceResponse,
}

/// Snapshot returned by `POST /attendance/sync-status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    #[serde(flatten)]
    pub status: DutyStatusSnapshot,
    /// Whether the cached duty flag was wrong before this call.
    pub corrected: bool,
}

/// Body of `POST /attendance/check-ins`: a completed customer check-in and
/// the leg travelled to reach it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub check_in_id: DbId,
    pub origin: Coordinates,
    pub destination: Coordinates,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    /// False when the check-in was already on the record.
    pub attached: bool,
    pub leg_distance_km: f64,
    pub attendance: DailyAttendanceResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    pub distance_km: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a user exists, returning the full row.
async fn ensure_user_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// The attendance day `now` falls on for `user`.
fn day_for(state: &AppState, user: &User, now: Timestamp) -> NaiveDate {
    let offset = resolve_offset(
        user.utc_offset_minutes,
        state.config.default_utc_offset_minutes,
    );
    attendance_day(now, offset)
}

/// Recompute and rewrite the caller's duty flag for today.
async fn reconcile_today(state: &AppState, user_id: DbId) -> AppResult<Reconciliation> {
    let user = ensure_user_exists(&state.pool, user_id).await?;
    let day = day_for(state, &user, Utc::now());

    let result = AttendanceRepo::reconcile(&state.pool, user_id, day)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    if result.corrected() {
        state.event_bus.publish(AttendanceEvent::status_corrected(
            user_id,
            result.previous_duty_status,
            result.snapshot.is_on_duty,
        ));
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/attendance
///
/// Paginated attendance history, newest day first. Non-privileged callers
/// only ever see their own records.
pub async fn list_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<AttendanceListParams>,
) -> AppResult<Json<PageResponse<DailyAttendanceResponse>>> {
    let filter = build_filter(
        auth.scoped_user_filter(params.user_id),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;
    let (page, limit) = params.page_and_limit();

    let total = AttendanceRepo::count(&state.pool, &filter).await?;
    let rows = AttendanceRepo::list(&state.pool, &filter, limit, page_offset(page, limit)).await?;

    Ok(Json(PageResponse {
        data: rows.into_iter().map(DailyAttendanceResponse::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        },
    }))
}

/// GET /api/v1/attendance/{id}
pub async fn get_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DailyAttendanceResponse>>> {
    let record = AttendanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DailyAttendance",
            id,
        }))?;
    auth.authorize_owner(record.user_id)?;

    Ok(Json(DataResponse {
        data: record.into(),
    }))
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// POST /api/v1/attendance
///
/// Start or end a duty session for the caller. Rejections (bad location,
/// unknown action, already on duty, not on duty) return 400 and leave the
/// day's record untouched.
pub async fn toggle_duty(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ToggleRequest>,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    let action: SessionAction = input
        .action
        .as_deref()
        .ok_or_else(|| AttendanceError::Validation("action is required".to_string()))?
        .parse()?;
    let payload = input
        .location
        .ok_or_else(|| AttendanceError::Validation("location is required".to_string()))?;

    let now = Utc::now();
    let location = validate_location(&payload, now)?;

    let user = ensure_user_exists(&state.pool, auth.user_id).await?;
    let day = day_for(&state, &user, now);

    let outcome = match action {
        SessionAction::Start => {
            AttendanceRepo::start_session(&state.pool, user.id, day, location, now).await
        }
        SessionAction::End => {
            AttendanceRepo::end_session(&state.pool, user.id, day, location, now).await
        }
    }
    .map_err(|e| {
        tracing::info!(
            user_id = user.id,
            action = action.as_str(),
            error = %e,
            "Duty toggle rejected"
        );
        AppError::from(e)
    })?;

    let record_id = outcome.record.id;
    let event = match action {
        SessionAction::Start => {
            AttendanceEvent::duty_started(user.id, record_id, &outcome.session)
        }
        SessionAction::End => AttendanceEvent::duty_ended(user.id, record_id, &outcome.session),
    };
    state.event_bus.publish(event);

    tracing::info!(
        user_id = user.id,
        record_id,
        action = action.as_str(),
        %day,
        total_hours = outcome.record.total_hours,
        "Duty toggled"
    );

    Ok(Json(DataResponse {
        data: ToggleResponse {
            action: action.as_str(),
            session: outcome.session,
            attendance: outcome.record.into(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/attendance/status
///
/// Today's duty status for the caller, derived from the session list. The
/// cached flag on the user row is rewritten on every call.
pub async fn get_status(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DutyStatusSnapshot>>> {
    let result = reconcile_today(&state, auth.user_id).await?;
    if result.corrected() {
        tracing::debug!(user_id = auth.user_id, "Duty flag refreshed on status read");
    }
    Ok(Json(DataResponse {
        data: result.snapshot,
    }))
}

/// POST /api/v1/attendance/sync-status
///
/// Explicit reconciliation. Same snapshot as `GET /status`, plus whether a
/// stale flag was corrected.
pub async fn sync_status(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SyncStatusResponse>>> {
    let result = reconcile_today(&state, auth.user_id).await?;
    let corrected = result.corrected();

    if corrected {
        tracing::warn!(
            user_id = auth.user_id,
            cached = result.previous_duty_status,
            derived = result.snapshot.is_on_duty,
            "Corrected drifted duty status"
        );
    } else {
        tracing::debug!(user_id = auth.user_id, "Duty status already in sync");
    }

    Ok(Json(DataResponse {
        data: SyncStatusResponse {
            status: result.snapshot,
            corrected,
        },
    }))
}

// ---------------------------------------------------------------------------
// Check-ins
// ---------------------------------------------------------------------------

/// POST /api/v1/attendance/check-ins
///
/// Attach a completed customer check-in to the caller's record for today and
/// add the length of its travel leg to `totalDistance`. Repeating a
/// `checkInId` leaves the record as it is.
pub async fn record_check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CheckInRequest>,
) -> AppResult<Json<DataResponse<CheckInResponse>>> {
    let origin = validate_coordinates(input.origin.latitude, input.origin.longitude)?;
    let destination =
        validate_coordinates(input.destination.latitude, input.destination.longitude)?;
    let leg_distance_km = distance_between(&origin, &destination);

    let user = ensure_user_exists(&state.pool, auth.user_id).await?;
    let day = day_for(&state, &user, Utc::now());

    let recorded = AttendanceRepo::record_check_in(
        &state.pool,
        user.id,
        day,
        input.check_in_id,
        leg_distance_km,
    )
    .await?;

    let (record, attached) = match recorded {
        Some(record) => {
            tracing::info!(
                user_id = user.id,
                record_id = record.id,
                check_in_id = input.check_in_id,
                leg_distance_km,
                total_distance = record.total_distance,
                "Check-in attached"
            );
            (record, true)
        }
        None => {
            let record = AttendanceRepo::find_for_day(&state.pool, user.id, day)
                .await?
                .ok_or_else(|| {
                    CoreError::Validation(
                        "No attendance record for today; start duty before checking in"
                            .to_string(),
                    )
                })?;
            tracing::debug!(
                user_id = user.id,
                check_in_id = input.check_in_id,
                "Check-in already attached"
            );
            (record, false)
        }
    };

    Ok(Json(DataResponse {
        data: CheckInResponse {
            attached,
            leg_distance_km,
            attendance: record.into(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// GET /api/v1/attendance/stats/overview
///
/// Totals and per-day averages over the requested range, role-scoped like
/// the history listing.
pub async fn stats_overview(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<StatsParams>,
) -> AppResult<Json<DataResponse<AttendanceOverview>>> {
    let filter = build_filter(
        auth.scoped_user_filter(params.user_id),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;

    let figures = AttendanceRepo::day_figures(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: overview(figures),
    }))
}

/// GET /api/v1/attendance/distance
///
/// Great-circle distance in kilometres between two coordinates.
pub async fn distance(
    _auth: AuthUser,
    ValidQuery(params): ValidQuery<DistanceParams>,
) -> AppResult<Json<DataResponse<DistanceResponse>>> {
    let from = validate_coordinates(params.lat1, params.lon1)?;
    let to = validate_coordinates(params.lat2, params.lon2)?;

    Ok(Json(DataResponse {
        data: DistanceResponse {
            distance_km: distance_between(&from, &to),
        },
    }))
}
