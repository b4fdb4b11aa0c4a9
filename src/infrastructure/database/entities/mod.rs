//! Database entities module

pub mod appointment;
pub mod listing;
pub mod quote;
pub mod user;

pub use appointment::Entity as Appointment;
pub use listing::Entity as Listing;
pub use quote::Entity as Quote;
pub use user::Entity as User;
