//! Appointment aggregate: service bookings tied to a customer

pub mod model;
pub mod repository;

pub use model::{Appointment, AppointmentFilter, AppointmentStatus};
pub use repository::AppointmentRepository;
