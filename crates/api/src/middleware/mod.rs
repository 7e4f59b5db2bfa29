//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac`] -- Role-based scoping of attendance reads.

pub mod auth;
pub mod rbac;
