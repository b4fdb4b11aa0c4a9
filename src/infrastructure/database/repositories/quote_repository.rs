//! SeaORM implementation of QuoteRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{DomainError, DomainResult, Quote, QuoteFilter, QuoteRepository, QuoteStatus};
use crate::infrastructure::database::entities::quote;
use crate::shared::PaginatedResult;

fn status_to_entity(s: QuoteStatus) -> quote::QuoteStatus {
    match s {
        QuoteStatus::InAfwachting => quote::QuoteStatus::InAfwachting,
        QuoteStatus::Geaccepteerd => quote::QuoteStatus::Geaccepteerd,
        QuoteStatus::Geweigerd => quote::QuoteStatus::Geweigerd,
    }
}

fn entity_to_domain(m: quote::Model) -> Quote {
    Quote {
        id: m.id,
        user_id: m.user_id,
        subject: m.subject,
        amount_cents: m.amount_cents,
        description: m.description,
        status: match m.status {
            quote::QuoteStatus::InAfwachting => QuoteStatus::InAfwachting,
            quote::QuoteStatus::Geaccepteerd => QuoteStatus::Geaccepteerd,
            quote::QuoteStatus::Geweigerd => QuoteStatus::Geweigerd,
        },
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(q: Quote) -> quote::ActiveModel {
    quote::ActiveModel {
        id: Set(q.id),
        user_id: Set(q.user_id),
        subject: Set(q.subject),
        amount_cents: Set(q.amount_cents),
        description: Set(q.description),
        status: Set(status_to_entity(q.status)),
        created_at: Set(q.created_at),
        updated_at: Set(q.updated_at),
    }
}

pub struct SeaOrmQuoteRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuoteRepository for SeaOrmQuoteRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Quote>> {
        let model = quote::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn list(&self, filter: QuoteFilter) -> DomainResult<PaginatedResult<Quote>> {
        let mut query = quote::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(quote::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(quote::Column::Status.eq(status_to_entity(status)));
        }

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(quote::Column::CreatedAt)
            .offset(filter.page.offset())
            .limit(u64::from(filter.page.limit))
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(entity_to_domain).collect();
        Ok(PaginatedResult::new(items, total, filter.page))
    }

    async fn save(&self, q: Quote) -> DomainResult<Quote> {
        let result = to_active_model(q).insert(&self.db).await?;
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut q: Quote) -> DomainResult<Quote> {
        let existing = quote::Entity::find_by_id(q.id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Quote", &q.id))?;

        q.created_at = existing.created_at;
        q.updated_at = Utc::now();

        let result = to_active_model(q).update(&self.db).await?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = quote::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Quote", id));
        }

        Ok(())
    }
}
