//! Listings module: public catalogue and admin CRUD with media uploads

pub mod dto;
pub mod handlers;
pub mod multipart;

pub use dto::*;
pub use handlers::*;
