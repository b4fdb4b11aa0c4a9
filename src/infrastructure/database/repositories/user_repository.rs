use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, PendingActivation, UpdateUserDto, User,
    UserRepositoryInterface, UserRole,
};
use crate::infrastructure::database::entities::user;
use crate::shared::PaginatedResult;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: &str) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Klant => UserRole::Klant,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Klant => user::UserRole::Klant,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        activation_token_hash: model.activation_token_hash,
        activation_expires_at: model.activation_expires_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

fn email_conflict(e: DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::Conflict("Email already exists".to_string()),
        other => other,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let (token_hash, expires_at) = match dto.activation {
            Some(a) => (Some(a.token_hash), Some(a.expires_at)),
            None => (None, None),
        };

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            first_name: Set(dto.first_name),
            last_name: Set(dto.last_name),
            phone: Set(dto.phone),
            role: Set(domain_role_to_entity(dto.role)),
            is_active: Set(dto.is_active),
            activation_token_hash: Set(token_hash),
            activation_expires_at: Set(expires_at),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(email_conflict)?;
        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(search) = dto.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Email.contains(search))
                    .add(user::Column::FirstName.contains(search))
                    .add(user::Column::LastName.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(dto.page.offset())
            .limit(u64::from(dto.page.limit))
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(user_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, dto.page))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_activation_hash(&self, token_hash: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::ActivationTokenHash.eq(token_hash))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(first_name) = dto.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = dto.phone {
            active.phone = Set(Some(phone).filter(|p| !p.trim().is_empty()));
        }
        if let Some(role) = dto.role {
            active.role = Set(domain_role_to_entity(role));
        }
        if let Some(is_active) = dto.is_active {
            active.is_active = Set(is_active);
        }

        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(email_conflict)?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn set_activation(&self, id: &str, activation: PendingActivation) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.activation_token_hash = Set(Some(activation.token_hash));
        active.activation_expires_at = Set(Some(activation.expires_at));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn activate_user(&self, id: &str, password_hash: &str) -> DomainResult<User> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash.to_string());
        active.is_active = Set(true);
        active.activation_token_hash = Set(None);
        active.activation_expires_at = Set(None);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await?;
        Ok(user_model_to_domain(updated))
    }

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.last_login_at = Set(Some(at));
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connect_in_memory;

    fn dto(email: &str) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Jan".to_string(),
            last_name: "Jansen".to_string(),
            phone: None,
            role: UserRole::Klant,
            is_active: true,
            activation: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        repo.create_user(dto("jan@example.nl")).await.unwrap();

        let err = repo.create_user(dto("jan@example.nl")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn activation_clears_token_and_enables_account() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        let mut pending = dto("gast@example.nl");
        pending.is_active = false;
        pending.activation = Some(PendingActivation {
            token_hash: "abc".to_string(),
            expires_at: Utc::now(),
        });
        let user = repo.create_user(pending).await.unwrap();

        let found = repo.get_user_by_activation_hash("abc").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id.clone()));

        let activated = repo.activate_user(&user.id, "new-hash").await.unwrap();
        assert!(activated.is_active);
        assert!(activated.activation_token_hash.is_none());
        assert!(repo.get_user_by_activation_hash("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_search_and_role() {
        let repo = UserRepository::new(connect_in_memory().await.unwrap());
        repo.create_user(dto("jan@example.nl")).await.unwrap();
        let mut admin = dto("beheer@example.nl");
        admin.role = UserRole::Admin;
        admin.first_name = "Petra".to_string();
        repo.create_user(admin).await.unwrap();

        let admins = repo
            .list_users(GetUserDto {
                role: Some(UserRole::Admin),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.total, 1);

        let search = repo
            .list_users(GetUserDto {
                search: Some("petra".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);
        assert_eq!(search.items[0].email, "beheer@example.nl");
    }
}
