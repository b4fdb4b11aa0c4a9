//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::application::access::Actor;
use crate::application::notifications::Notifier;
use crate::application::provisioning::new_activation;
use crate::domain::{
    normalize_email, CreateUserDto, DomainError, DomainResult, GetUserDto, RepositoryProvider,
    UpdateUserDto, User, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::crypto::token::hash_token;
use crate::shared::PaginatedResult;

const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Input for registration and admin-created accounts
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// User service: orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    notifier: Arc<Notifier>,
    activation_ttl_hours: i64,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        notifier: Arc<Notifier>,
        activation_ttl_hours: i64,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            notifier,
            activation_ttl_hours,
        }
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        self.repos.users()
    }

    fn issue_token(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user.id, &user.email, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }

    async fn require_user(&self, id: &str) -> DomainResult<User> {
        self.users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.users().get_user_by_email(&normalize_email(email)).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is not activated".into()));
        }

        let now = Utc::now();
        self.users().record_login(&user.id, now).await?;

        info!(user_id = %user.id, "User logged in");
        self.issue_token(User {
            last_login_at: Some(now),
            ..user
        })
    }

    /// Set the first password of a provisioned account and log it in.
    pub async fn activate(&self, token: &str, password: &str) -> DomainResult<AuthResult> {
        let invalid = || DomainError::Validation("Invalid or expired activation token".into());

        let user = self
            .users()
            .get_user_by_activation_hash(&hash_token(token.trim()))
            .await?
            .ok_or_else(invalid)?;

        match user.activation_expires_at {
            Some(expires_at) if expires_at >= Utc::now() => {}
            _ => return Err(invalid()),
        }
        check_password_strength(password)?;

        let hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        let user = self.users().activate_user(&user.id, &hash).await?;

        info!(user_id = %user.id, "Account activated");
        self.issue_token(user)
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-service sign-up. Always creates an active customer.
    pub async fn register(&self, new_user: NewUser) -> DomainResult<User> {
        let user = self
            .insert_active(NewUser {
                role: UserRole::Klant,
                ..new_user
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    async fn insert_active(&self, new_user: NewUser) -> DomainResult<User> {
        check_password_strength(&new_user.password)?;

        let email = normalize_email(&new_user.email);
        if self.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(&new_user.password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        self.users()
            .create_user(CreateUserDto {
                email,
                password_hash,
                first_name: new_user.first_name.trim().to_string(),
                last_name: new_user.last_name.trim().to_string(),
                phone: new_user.phone.filter(|p| !p.trim().is_empty()),
                role: new_user.role,
                is_active: true,
                activation: None,
            })
            .await
    }

    // ── Queries ─────────────────────────────────────────────────

    /// List users with search, filtering and pagination.
    pub async fn list_users(
        &self,
        actor: &Actor,
        dto: GetUserDto,
    ) -> DomainResult<PaginatedResult<User>> {
        actor.require_admin()?;
        self.users().list_users(dto).await
    }

    /// Admins may read anyone; customers only themselves.
    pub async fn get_user(&self, actor: &Actor, id: &str) -> DomainResult<User> {
        actor.ensure_can_access(id)?;
        self.require_user(id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn create_user(&self, actor: &Actor, new_user: NewUser) -> DomainResult<User> {
        actor.require_admin()?;
        let user = self.insert_active(new_user).await?;
        info!(user_id = %user.id, role = %user.role, created_by = %actor.user_id, "User created");
        Ok(user)
    }

    /// Update profile fields. Role and active flag are admin-only.
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: &str,
        mut dto: UpdateUserDto,
    ) -> DomainResult<User> {
        actor.ensure_can_access(id)?;
        if !actor.is_admin() && dto.touches_privileged_fields() {
            return Err(DomainError::Forbidden(
                "Only administrators can change role or account status".into(),
            ));
        }

        dto.email = dto.email.as_deref().map(normalize_email);

        self.users()
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        check_password_strength(new_password)?;

        let user = self.require_user(user_id).await?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        self.users().update_user_password(user_id, &new_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Delete a user; their appointments and quotes go with them.
    pub async fn delete_user(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;
        if actor.is(id) {
            return Err(DomainError::Validation(
                "You cannot delete your own account".into(),
            ));
        }

        self.users().delete_user(id).await?;
        info!(user_id = %id, deleted_by = %actor.user_id, "User deleted");
        Ok(())
    }

    /// Rotate the activation token of an inactive account and email it again.
    pub async fn resend_activation(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;

        let user = self.require_user(id).await?;
        if user.is_active {
            return Err(DomainError::Conflict("Account is already active".into()));
        }

        let (token, activation) = new_activation(self.activation_ttl_hours);
        self.users().set_activation(&user.id, activation).await?;
        self.notifier.account_activation(&user, &token);

        info!(user_id = %user.id, "Activation email re-sent");
        Ok(())
    }

    /// Seed an administrator when the users table is empty.
    pub async fn ensure_default_admin(&self, new_user: NewUser) -> DomainResult<Option<User>> {
        if self.users().count_users().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .insert_active(NewUser {
                role: UserRole::Admin,
                ..new_user
            })
            .await?;
        info!(user_id = %admin.id, email = %admin.email, "Default admin created");
        Ok(Some(admin))
    }
}

fn check_password_strength(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::application::provisioning::{GuestDetails, ProvisionOutcome};
    use crate::application::test_support::TestContext;
    use crate::domain::PendingActivation;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "geheim123".to_string(),
            first_name: "Anna".to_string(),
            last_name: "de Vries".to_string(),
            phone: None,
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn register_always_creates_customer() {
        let ctx = TestContext::new().await;
        let user = ctx.users.register(new_user("Anna@Example.nl")).await.unwrap();
        assert_eq!(user.role, UserRole::Klant);
        assert_eq!(user.email, "anna@example.nl");
        assert!(user.is_active);

        let err = ctx.users.register(new_user("anna@example.nl")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_checks_password_and_activation() {
        let ctx = TestContext::new().await;
        ctx.users.register(new_user("anna@example.nl")).await.unwrap();

        let ok = ctx.users.login("ANNA@example.nl", "geheim123").await.unwrap();
        assert_eq!(ok.token_type, "Bearer");
        assert!(ok.user.last_login_at.is_some());

        let err = ctx.users.login("anna@example.nl", "fout").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let guest = ctx
            .provisioner
            .provision(GuestDetails {
                email: "gast@example.nl".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(matches!(guest, ProvisionOutcome::Provisioned { .. }));
        let err = ctx.users.login("gast@example.nl", "whatever1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn activation_sets_password_once() {
        let ctx = TestContext::new().await;
        let ProvisionOutcome::Provisioned {
            user,
            activation_token,
        } = ctx
            .provisioner
            .provision(GuestDetails {
                email: "gast@example.nl".into(),
                ..Default::default()
            })
            .await
            .unwrap()
        else {
            panic!("expected a provisioned account");
        };

        let short = ctx.users.activate(&activation_token, "kort").await.unwrap_err();
        assert!(matches!(short, DomainError::Validation(_)));

        let auth = ctx
            .users
            .activate(&activation_token, "nieuw-wachtwoord")
            .await
            .unwrap();
        assert_eq!(auth.user.id, user.id);
        assert!(auth.user.is_active);

        let again = ctx
            .users
            .activate(&activation_token, "nieuw-wachtwoord")
            .await
            .unwrap_err();
        assert!(matches!(again, DomainError::Validation(_)));

        ctx.users
            .login("gast@example.nl", "nieuw-wachtwoord")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn expired_activation_token_is_rejected() {
        let ctx = TestContext::new().await;
        let user = ctx.customer("oud@example.nl").await;
        ctx.repos
            .users()
            .set_activation(
                &user.id,
                PendingActivation {
                    token_hash: hash_token("verlopen"),
                    expires_at: Utc::now() - Duration::hours(1),
                },
            )
            .await
            .unwrap();

        let err = ctx.users.activate("verlopen", "nieuw-wachtwoord").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn customers_cannot_escalate_or_read_others() {
        let ctx = TestContext::new().await;
        let me = ctx.customer("ik@example.nl").await;
        let other = ctx.customer("ander@example.nl").await;
        let actor = Actor::new(me.id.clone(), UserRole::Klant);

        let err = ctx.users.get_user(&actor, &other.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = ctx
            .users
            .update_user(
                &actor,
                &me.id,
                UpdateUserDto {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let updated = ctx
            .users
            .update_user(
                &actor,
                &me.id,
                UpdateUserDto {
                    first_name: Some("Ikke".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Ikke");
        assert_eq!(updated.role, UserRole::Klant);
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let ctx = TestContext::new().await;
        let admin = ctx.admin().await;
        let actor = Actor::new(admin.id.clone(), UserRole::Admin);

        let err = ctx.users.delete_user(&actor, &admin.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let klant = ctx.customer("weg@example.nl").await;
        ctx.users.delete_user(&actor, &klant.id).await.unwrap();
        let err = ctx.users.get_user(&actor, &klant.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn resend_activation_only_for_inactive_accounts() {
        let ctx = TestContext::new().await;
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);
        let active = ctx.customer("actief@example.nl").await;

        let err = ctx.users.resend_activation(&admin, &active.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let outcome = ctx
            .provisioner
            .provision(GuestDetails {
                email: "gast@example.nl".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let before = outcome.user().activation_token_hash.clone();

        ctx.users
            .resend_activation(&admin, &outcome.user().id)
            .await
            .unwrap();
        let after = ctx
            .repos
            .users()
            .get_user_by_id(&outcome.user().id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(after.activation_token_hash, before);

        let mail = ctx.wait_for_mail(1).await;
        assert_eq!(mail[0].to, "gast@example.nl");
        assert!(mail[0].text_body.contains("/activeren?token="));
    }

    #[tokio::test]
    async fn default_admin_only_seeded_into_empty_table() {
        let ctx = TestContext::new().await;
        let seeded = ctx
            .users
            .ensure_default_admin(new_user("beheer@example.nl"))
            .await
            .unwrap();
        assert_eq!(seeded.map(|u| u.role), Some(UserRole::Admin));

        let again = ctx
            .users
            .ensure_default_admin(new_user("ander@example.nl"))
            .await
            .unwrap();
        assert!(again.is_none());
    }
}
