//! Duty attendance engine.
//!
//! A field worker toggles duty on and off during the day. Each toggle pair is
//! a [`DutySession`](session::DutySession) embedded in the per-user, per-day
//! attendance record. The submodules are layered leaves-first:
//!
//! - [`location`] -- validates a raw geolocation payload into a [`LocationSnapshot`](location::LocationSnapshot).
//! - [`distance`] -- haversine great-circle distance.
//! - [`session`] -- start/end lifecycle and the single-active-session rule.
//! - [`aggregate`] -- daily totals recomputed on every mutation.
//! - [`reconcile`] -- derives the "on duty" flag from the session list.
//! - [`day`] -- calendar-day bucketing in the user's declared offset.
//! - [`legacy`] -- single check-in/check-out projection for older clients.
//! - [`stats`] -- totals and averages over a date range.

pub mod aggregate;
pub mod day;
pub mod distance;
pub mod error;
pub mod legacy;
pub mod location;
pub mod reconcile;
pub mod session;
pub mod stats;

pub use aggregate::{recompute_totals, round2, DailyTotals, DutyStatus};
pub use error::AttendanceError;
pub use location::{validate_location, LocationPayload, LocationSnapshot};
pub use reconcile::{derive_status, DutyStatusSnapshot};
pub use session::{end_session, start_session, DutySession, SessionAction, SessionStatus};
