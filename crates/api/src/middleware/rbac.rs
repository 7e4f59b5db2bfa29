//! Role-based scoping for attendance reads.
//!
//! Admins and managers may read any user's attendance. Everyone else is
//! confined to their own records.

use fieldcrm_core::error::CoreError;
use fieldcrm_core::roles::is_privileged;
use fieldcrm_core::types::DbId;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

impl AuthUser {
    /// Whether this user may read other users' attendance.
    pub fn is_privileged(&self) -> bool {
        is_privileged(&self.role)
    }

    /// The `user_id` filter to apply to a list or stats query.
    ///
    /// Privileged callers get what they asked for (`None` = everyone).
    /// Others always get their own id; a foreign `requested` id is ignored.
    pub fn scoped_user_filter(&self, requested: Option<DbId>) -> Option<DbId> {
        if self.is_privileged() {
            requested
        } else {
            Some(self.user_id)
        }
    }

    /// Reject with 403 unless the caller owns the record or is privileged.
    pub fn authorize_owner(&self, owner_id: DbId) -> AppResult<()> {
        if self.user_id == owner_id || self.is_privileged() {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "You can only view your own attendance".into(),
            )))
        }
    }
}
