//! Well-known role name constants.
//!
//! These must match the `role` values seeded by `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_FIELD_AGENT: &str = "field_agent";

/// Roles allowed to read other users' attendance.
pub const PRIVILEGED_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Whether `role` may see attendance records of users other than itself.
pub fn is_privileged(role: &str) -> bool {
    PRIVILEGED_ROLES.contains(&role)
}
