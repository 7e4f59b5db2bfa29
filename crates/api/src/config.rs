use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret and database URL have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum pooled database connections (default: `10`).
    pub db_max_connections: u32,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// UTC offset used to bucket attendance days for users without a
    /// declared offset (default: `0`).
    pub default_utc_offset_minutes: i32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                                 | Default                 |
    /// |-----------------------------------------|-------------------------|
    /// | `HOST`                                  | `0.0.0.0`               |
    /// | `PORT`                                  | `3000`                  |
    /// | `CORS_ORIGINS`                          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`                  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`                 | `30`                    |
    /// | `DB_MAX_CONNECTIONS`                    | `10`                    |
    /// | `ATTENDANCE_DEFAULT_UTC_OFFSET_MINUTES` | `0`                     |
    ///
    /// See [`JwtConfig::from_env`] for the JWT variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let default_utc_offset_minutes: i32 = std::env::var("ATTENDANCE_DEFAULT_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("ATTENDANCE_DEFAULT_UTC_OFFSET_MINUTES must be a valid i32");
        assert!(
            fieldcrm_core::attendance::day::offset_from_minutes(default_utc_offset_minutes)
                .is_some(),
            "ATTENDANCE_DEFAULT_UTC_OFFSET_MINUTES must be within +/-840"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            db_max_connections,
            jwt,
            default_utc_offset_minutes,
        }
    }
}
