//! Field CRM attendance events.
//!
//! - [`AttendanceEvent`] -- typed duty started/ended/status corrected events.
//! - [`EventBus`] -- in-process broadcast hub, handed to request handlers
//!   through app state.
//! - [`EventLogger`] -- background subscriber that records every event in the
//!   structured log. Delivery to devices lives outside this service.

pub mod attendance;
pub mod bus;
pub mod logger;

pub use attendance::{AttendanceEvent, AttendanceEventKind};
pub use bus::EventBus;
pub use logger::EventLogger;
