//! Totals and averages over a range of attendance days.

use serde::Serialize;

use super::aggregate::round2;

/// The per-day figures the overview is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayFigures {
    pub total_hours: f64,
    pub total_distance: f64,
    pub session_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceOverview {
    pub total_days: usize,
    pub total_hours: f64,
    pub total_distance: f64,
    pub total_sessions: usize,
    pub average_hours_per_day: f64,
    pub average_sessions_per_day: f64,
    pub average_distance_per_day: f64,
}

/// Summarise a set of days. Averages divide by days that have a record.
pub fn overview<I>(days: I) -> AttendanceOverview
where
    I: IntoIterator<Item = DayFigures>,
{
    let mut total_days = 0usize;
    let mut hours = 0.0;
    let mut distance = 0.0;
    let mut sessions = 0usize;

    for day in days {
        total_days += 1;
        hours += day.total_hours;
        distance += day.total_distance;
        sessions += day.session_count;
    }

    if total_days == 0 {
        return AttendanceOverview::default();
    }

    let n = total_days as f64;
    AttendanceOverview {
        total_days,
        total_hours: round2(hours),
        total_distance: round2(distance),
        total_sessions: sessions,
        average_hours_per_day: round2(hours / n),
        average_sessions_per_day: round2(sessions as f64 / n),
        average_distance_per_day: round2(distance / n),
    }
}
