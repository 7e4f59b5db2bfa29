//! Domain logic for the field-sales duty attendance service.
//!
//! Everything in this crate is pure: no database, no HTTP, no clock reads
//! except where a caller passes `now` in explicitly.

pub mod attendance;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
