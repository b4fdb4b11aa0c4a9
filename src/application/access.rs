//! Who is asking, and what they may touch

use crate::domain::{DomainError, DomainResult, UserRole};

/// The authenticated caller of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Admin role required".into()))
        }
    }

    /// Admins see every row; customers only their own.
    pub fn ensure_can_access(&self, owner_id: &str) -> DomainResult<()> {
        if self.is_admin() || self.is(owner_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "You do not have access to this resource".into(),
            ))
        }
    }

    /// Row filter for list queries. A customer's own id always wins over
    /// whatever `userId` they passed.
    pub fn scope(&self, requested_user_id: Option<String>) -> Option<String> {
        if self.is_admin() {
            requested_user_id
        } else {
            Some(self.user_id.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_scope_ignores_requested_user() {
        let klant = Actor::new("u1", UserRole::Klant);
        assert_eq!(klant.scope(Some("u2".into())), Some("u1".to_string()));
        assert_eq!(klant.scope(None), Some("u1".to_string()));

        let admin = Actor::new("a1", UserRole::Admin);
        assert_eq!(admin.scope(Some("u2".into())), Some("u2".to_string()));
        assert_eq!(admin.scope(None), None);
    }

    #[test]
    fn access_checks() {
        let klant = Actor::new("u1", UserRole::Klant);
        assert!(klant.ensure_can_access("u1").is_ok());
        assert!(matches!(
            klant.ensure_can_access("u2"),
            Err(DomainError::Forbidden(_))
        ));
        assert!(klant.require_admin().is_err());
        assert!(Actor::new("a", UserRole::Admin).ensure_can_access("u2").is_ok());
    }
}
