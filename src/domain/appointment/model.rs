use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentStatus {
    #[default]
    InAfwachting,
    Bevestigd,
    Geannuleerd,
    Voltooid,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InAfwachting => "in afwachting",
            Self::Bevestigd => "bevestigd",
            Self::Geannuleerd => "geannuleerd",
            Self::Voltooid => "voltooid",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in afwachting" => Ok(Self::InAfwachting),
            "bevestigd" => Ok(Self::Bevestigd),
            "geannuleerd" => Ok(Self::Geannuleerd),
            "voltooid" => Ok(Self::Voltooid),
            other => Err(DomainError::Validation(format!(
                "Unknown appointment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub service_type: String,
    pub requested_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    /// Restrict to one customer; `None` means all rows
    pub user_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub page: PageRequest,
}
