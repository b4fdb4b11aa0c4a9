//! Listing aggregate: vehicles and boats offered for sale

pub mod model;
pub mod repository;

pub use model::{Listing, ListingFilter, ListingStatus, ListingType};
pub use repository::ListingRepository;
