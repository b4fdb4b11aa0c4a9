use async_trait::async_trait;

use super::model::{Quote, QuoteFilter};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Quote>>;
    async fn list(&self, filter: QuoteFilter) -> DomainResult<PaginatedResult<Quote>>;
    async fn save(&self, quote: Quote) -> DomainResult<Quote>;
    async fn update(&self, quote: Quote) -> DomainResult<Quote>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
