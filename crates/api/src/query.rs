//! Query parameter types for the attendance endpoints.
//!
//! Dates arrive as strings and are parsed here, so the error message names
//! the offending parameter.

use chrono::NaiveDate;
use fieldcrm_core::error::CoreError;
use fieldcrm_core::pagination::{clamp_limit, clamp_page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use fieldcrm_core::types::DbId;
use fieldcrm_db::models::attendance::AttendanceFilter;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `?startDate=&endDate=&userId=&page=&limit=` for `GET /attendance`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<DbId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AttendanceListParams {
    /// Clamped `(page, limit)`.
    pub fn page_and_limit(&self) -> (i64, i64) {
        (
            clamp_page(self.page),
            clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        )
    }
}

/// `?startDate=&endDate=&userId=` for `GET /attendance/stats/overview`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<DbId>,
}

/// `?lat1=&lon1=&lat2=&lon2=` for `GET /attendance/distance`.
#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

/// Parse optional `YYYY-MM-DD` bounds into a repository filter.
///
/// Rejects unparsable dates and `start > end`.
pub fn build_filter(
    user_id: Option<DbId>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> AppResult<AttendanceFilter> {
    let start_date = start_date.map(|s| parse_date("startDate", s)).transpose()?;
    let end_date = end_date.map(|s| parse_date("endDate", s)).transpose()?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(AppError::Core(CoreError::Validation(format!(
                "startDate ({start}) must not be after endDate ({end})"
            ))));
        }
    }

    Ok(AttendanceFilter {
        user_id,
        start_date,
        end_date,
    })
}

fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "{field} '{value}' is not a valid date (expected YYYY-MM-DD)"
        )))
    })
}
