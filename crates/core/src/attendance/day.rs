//! Calendar-day bucketing.
//!
//! Instants are stored in UTC; the day a toggle belongs to is its calendar
//! date in the user's declared UTC offset.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use crate::types::Timestamp;

/// Largest offset any real timezone uses (UTC+14, Line Islands).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Build an offset from minutes east of UTC, rejecting impossible values.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

/// The user's offset if declared and valid, else the server default, else UTC.
pub fn resolve_offset(user_offset_minutes: Option<i32>, default_minutes: i32) -> FixedOffset {
    user_offset_minutes
        .and_then(offset_from_minutes)
        .or_else(|| offset_from_minutes(default_minutes))
        .unwrap_or_else(|| Utc.fix())
}

/// The attendance day `now` falls on in `offset`.
pub fn attendance_day(now: Timestamp, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}
