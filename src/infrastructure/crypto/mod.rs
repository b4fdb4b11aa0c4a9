//! Cryptographic helpers: JWT, password hashing and one-time tokens

pub mod jwt;
pub mod password;
pub mod token;
