//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a transaction connection) as the first argument.

pub mod attendance_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use user_repo::UserRepo;
