pub mod attendance;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /attendance                         list (GET), start/end toggle (POST)
/// /attendance/status                  today's duty status (GET)
/// /attendance/sync-status             reconcile cached duty flag (POST)
/// /attendance/stats/overview          range totals and averages (GET)
/// /attendance/distance                haversine utility (GET)
/// /attendance/{id}                    single record (GET)
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/attendance", attendance::router())
}
