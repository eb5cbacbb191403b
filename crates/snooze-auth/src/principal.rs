//! Authenticated principals and the same-user-or-staff rule

use serde::{Deserialize, Serialize};
use snooze_db::User;

use crate::error::AuthError;

/// Authenticated user information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub is_staff: bool,
}

impl Principal {
    /// Fail with `AuthorizationDenied` unless this principal may act for `target_username`
    pub fn require_same_user_or_staff(&self, target_username: &str) -> Result<(), AuthError> {
        if authorize_same_user_or_staff(self, target_username) {
            Ok(())
        } else {
            Err(AuthError::AuthorizationDenied)
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// A principal may act on its own account; staff may act on any account
pub fn authorize_same_user_or_staff(principal: &Principal, target_username: &str) -> bool {
    principal.username == target_username || principal.is_staff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(username: &str, is_staff: bool) -> Principal {
        Principal {
            username: username.to_string(),
            is_staff,
        }
    }

    #[test]
    fn test_same_user_allowed() {
        assert!(authorize_same_user_or_staff(&principal("user", false), "user"));
    }

    #[test]
    fn test_other_user_denied() {
        let user2 = principal("user2", false);
        assert!(!authorize_same_user_or_staff(&user2, "user"));
        assert!(matches!(
            user2.require_same_user_or_staff("user"),
            Err(AuthError::AuthorizationDenied)
        ));
    }

    #[test]
    fn test_staff_allowed_for_anyone() {
        let staff = principal("user2", true);
        assert!(authorize_same_user_or_staff(&staff, "user"));
        assert!(staff.require_same_user_or_staff("user").is_ok());
    }

    #[test]
    fn test_username_match_is_case_sensitive() {
        assert!(!authorize_same_user_or_staff(&principal("User", false), "user"));
    }
}
