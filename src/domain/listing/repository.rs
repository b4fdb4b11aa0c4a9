use async_trait::async_trait;

use super::model::{Listing, ListingFilter};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Listing>>;
    async fn list(&self, filter: ListingFilter) -> DomainResult<PaginatedResult<Listing>>;
    async fn save(&self, listing: Listing) -> DomainResult<Listing>;
    async fn update(&self, listing: Listing) -> DomainResult<Listing>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
