//! Route definitions for duty attendance.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET    /                  -> list_attendance
/// POST   /                  -> toggle_duty
/// GET    /status            -> get_status
/// POST   /sync-status       -> sync_status
/// POST   /check-ins         -> record_check_in
/// GET    /stats/overview    -> stats_overview
/// GET    /distance          -> distance
/// GET    /{id}              -> get_attendance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(attendance::list_attendance).post(attendance::toggle_duty),
        )
        .route("/status", get(attendance::get_status))
        .route("/sync-status", post(attendance::sync_status))
        .route("/check-ins", post(attendance::record_check_in))
        .route("/stats/overview", get(attendance::stats_overview))
        .route("/distance", get(attendance::distance))
        .route("/{id}", get(attendance::get_attendance))
}
