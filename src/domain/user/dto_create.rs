use chrono::{DateTime, Utc};

use super::UserRole;

/// Activation token state stored alongside a not-yet-activated account
#[derive(Debug, Clone)]
pub struct PendingActivation {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub activation: Option<PendingActivation>,
}
