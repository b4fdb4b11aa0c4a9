//! Create-or-invite for customers referenced by email
//!
//! Admins book appointments and send quotes for people who may not have an
//! account yet. An unknown address gets an inactive `klant` account with an
//! unusable password and a time-limited activation token.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::domain::{
    normalize_email, CreateUserDto, DomainError, DomainResult, PendingActivation,
    RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::crypto::token::{
    generate_activation_token, generate_placeholder_password, hash_token,
};

/// Contact details supplied for a customer who may not exist yet
#[derive(Debug, Clone, Default)]
pub struct GuestDetails {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ProvisionOutcome {
    /// The email already belonged to an account
    Existing(User),
    /// A new inactive account; the raw token goes into the activation link
    Provisioned { user: User, activation_token: String },
}

impl ProvisionOutcome {
    pub fn user(&self) -> &User {
        match self {
            Self::Existing(user) => user,
            Self::Provisioned { user, .. } => user,
        }
    }
}

/// Fresh activation token plus the state to persist for it.
pub fn new_activation(ttl_hours: i64) -> (String, PendingActivation) {
    let token = generate_activation_token();
    let pending = PendingActivation {
        token_hash: hash_token(&token),
        expires_at: Utc::now() + Duration::hours(ttl_hours),
    };
    (token, pending)
}

pub struct GuestProvisioner {
    repos: Arc<dyn RepositoryProvider>,
    activation_ttl_hours: i64,
}

impl GuestProvisioner {
    pub fn new(repos: Arc<dyn RepositoryProvider>, activation_ttl_hours: i64) -> Self {
        Self {
            repos,
            activation_ttl_hours,
        }
    }

    pub async fn provision(&self, details: GuestDetails) -> DomainResult<ProvisionOutcome> {
        let email = normalize_email(&details.email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        if let Some(user) = self.repos.users().get_user_by_email(&email).await? {
            return Ok(ProvisionOutcome::Existing(user));
        }

        let password_hash = hash_password(&generate_placeholder_password())
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        let (token, activation) = new_activation(self.activation_ttl_hours);

        let dto = CreateUserDto {
            email: email.clone(),
            password_hash,
            first_name: details.first_name.unwrap_or_default().trim().to_string(),
            last_name: details.last_name.unwrap_or_default().trim().to_string(),
            phone: details.phone.filter(|p| !p.trim().is_empty()),
            role: UserRole::Klant,
            is_active: false,
            activation: Some(activation),
        };

        match self.repos.users().create_user(dto).await {
            Ok(user) => {
                metrics::counter!("guest_accounts_provisioned_total").increment(1);
                info!(user_id = %user.id, email = %user.email, "Provisioned guest account");
                Ok(ProvisionOutcome::Provisioned {
                    user,
                    activation_token: token,
                })
            }
            // Lost a race with a concurrent insert of the same address.
            Err(DomainError::Conflict(_)) => self
                .repos
                .users()
                .get_user_by_email(&email)
                .await?
                .map(ProvisionOutcome::Existing)
                .ok_or_else(|| DomainError::Conflict("Email already exists".into())),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::TestContext;

    fn guest(email: &str) -> GuestDetails {
        GuestDetails {
            email: email.to_string(),
            first_name: Some("Gerrit".into()),
            last_name: Some("Gast".into()),
            phone: Some(" ".into()),
        }
    }

    #[tokio::test]
    async fn unknown_email_creates_inactive_customer() {
        let ctx = TestContext::new().await;
        let outcome = ctx
            .provisioner
            .provision(guest("  Gerrit@Example.NL "))
            .await
            .unwrap();

        let ProvisionOutcome::Provisioned {
            user,
            activation_token,
        } = outcome
        else {
            panic!("expected a provisioned account");
        };
        assert_eq!(user.email, "gerrit@example.nl");
        assert_eq!(user.role, UserRole::Klant);
        assert!(!user.is_active);
        assert!(user.phone.is_none());
        assert_eq!(activation_token.len(), 64);
        assert_eq!(user.activation_token_hash, Some(hash_token(&activation_token)));
        assert!(user.activation_expires_at.unwrap() > Utc::now() + Duration::hours(71));
    }

    #[tokio::test]
    async fn known_email_returns_existing_account() {
        let ctx = TestContext::new().await;
        let existing = ctx.customer("bekend@example.nl").await;

        let outcome = ctx
            .provisioner
            .provision(guest("BEKEND@example.nl"))
            .await
            .unwrap();
        assert!(matches!(&outcome, ProvisionOutcome::Existing(u) if u.id == existing.id));
    }

    #[tokio::test]
    async fn rejects_malformed_email() {
        let ctx = TestContext::new().await;
        let err = ctx.provisioner.provision(guest("geen-adres")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
