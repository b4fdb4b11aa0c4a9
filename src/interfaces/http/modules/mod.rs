pub mod appointments;
pub mod auth;
pub mod health;
pub mod listings;
pub mod metrics;
pub mod quotes;
pub mod request_id;
pub mod users;
