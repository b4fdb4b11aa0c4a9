//! Appointments module: customer bookings and admin scheduling

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
