//! Domain layer: entities, value types and repository interfaces

pub mod appointment;
pub mod listing;
pub mod quote;
pub mod repositories;
pub mod user;

pub use appointment::{Appointment, AppointmentFilter, AppointmentRepository, AppointmentStatus};
pub use listing::{Listing, ListingFilter, ListingRepository, ListingStatus, ListingType};
pub use quote::{Quote, QuoteFilter, QuoteRepository, QuoteStatus};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{
    normalize_email, CreateUserDto, GetUserDto, PendingActivation, UpdateUserDto, User,
    UserRepositoryInterface, UserRole,
};

pub use crate::shared::DomainError;
