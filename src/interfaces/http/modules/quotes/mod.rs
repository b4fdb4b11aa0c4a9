//! Quotes module: admin proposals and customer answers

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
