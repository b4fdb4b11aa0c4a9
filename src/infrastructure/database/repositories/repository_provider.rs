//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    AppointmentRepository, ListingRepository, QuoteRepository, RepositoryProvider,
    UserRepositoryInterface,
};

use super::appointment_repository::SeaOrmAppointmentRepository;
use super::listing_repository::SeaOrmListingRepository;
use super::quote_repository::SeaOrmQuoteRepository;
use super::user_repository::UserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let listing = repos.listings().find_by_id(&id).await?;
/// let mine = repos.quotes().list(QuoteFilter { user_id: Some(uid), ..Default::default() }).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: UserRepository,
    listings: SeaOrmListingRepository,
    appointments: SeaOrmAppointmentRepository,
    quotes: SeaOrmQuoteRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            listings: SeaOrmListingRepository::new(db.clone()),
            appointments: SeaOrmAppointmentRepository::new(db.clone()),
            quotes: SeaOrmQuoteRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn listings(&self) -> &dyn ListingRepository {
        &self.listings
    }

    fn appointments(&self) -> &dyn AppointmentRepository {
        &self.appointments
    }

    fn quotes(&self) -> &dyn QuoteRepository {
        &self.quotes
    }
}
