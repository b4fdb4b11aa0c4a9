pub mod access;
pub mod identity;
pub mod notifications;
pub mod provisioning;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for convenience
pub use access::Actor;
pub use identity::{AuthResult, NewUser, UserService};
pub use notifications::Notifier;
pub use provisioning::{GuestDetails, GuestProvisioner, ProvisionOutcome};
pub use services::{
    AppointmentChanges, AppointmentService, ListingChanges, ListingService, MediaUpload,
    NewAppointment, NewListing, NewQuote, QuoteChanges, QuoteService,
};
