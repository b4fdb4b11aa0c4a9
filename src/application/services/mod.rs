//! Application services

mod appointment;
mod listing;
mod quote;

use crate::domain::{DomainError, DomainResult};

/// Trimmed value of a mandatory text field; blank input is rejected.
fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

pub use appointment::{AppointmentChanges, AppointmentService, NewAppointment};
pub use listing::{ListingChanges, ListingService, MediaUpload, NewListing};
pub use quote::{NewQuote, QuoteChanges, QuoteService};
