//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod mail;
pub mod storage;

pub use database::{init_database, run_migrations, DatabaseConfig};
pub use mail::{dispatch, EmailMessage, HttpMailer, LogMailer, Mailer};
pub use storage::{MediaKind, MediaStorage};
