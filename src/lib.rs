//! # Dealership service
//!
//! Marketing site backend and back office for a car and boat dealership:
//! public listings, a customer area for appointments and quotes, and admin
//! management of everything.
//!
//! ## Architecture
//!
//! - **domain**: entities, value types and repository traits
//! - **application**: use cases, access rules, guest provisioning, notifications
//! - **infrastructure**: SeaORM persistence, crypto, mail delivery, media storage
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{config_path_from_env, default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::{create_api_router, ApiContext};
