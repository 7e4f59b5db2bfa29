use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fieldcrm_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus that attendance transitions are published on.
    pub event_bus: Arc<fieldcrm_events::EventBus>,
}
