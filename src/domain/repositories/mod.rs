//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::appointment::AppointmentRepository;
use super::listing::ListingRepository;
use super::quote::QuoteRepository;
use super::user::UserRepositoryInterface;
use crate::shared::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let listing = repos.listings().find_by_id("4f1c…").await?;
///     let user = repos.users().get_user_by_email("jan@example.nl").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn listings(&self) -> &dyn ListingRepository;
    fn appointments(&self) -> &dyn AppointmentRepository;
    fn quotes(&self) -> &dyn QuoteRepository;
}
