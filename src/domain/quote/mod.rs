//! Quote ("offerte") aggregate: priced proposals a customer accepts or rejects

pub mod model;
pub mod repository;

pub use model::{Quote, QuoteFilter, QuoteStatus};
pub use repository::QuoteRepository;
