use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStatus {
    #[default]
    InAfwachting,
    Geaccepteerd,
    Geweigerd,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InAfwachting => "in afwachting",
            Self::Geaccepteerd => "geaccepteerd",
            Self::Geweigerd => "geweigerd",
        }
    }

    /// Accepted and rejected are answers that only the customer can give.
    pub fn is_customer_response(&self) -> bool {
        matches!(self, Self::Geaccepteerd | Self::Geweigerd)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in afwachting" => Ok(Self::InAfwachting),
            "geaccepteerd" => Ok(Self::Geaccepteerd),
            "geweigerd" => Ok(Self::Geweigerd),
            other => Err(DomainError::Validation(format!(
                "Unknown quote status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quote {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    /// Quoted amount in euro cents
    pub amount_cents: i64,
    pub description: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub user_id: Option<String>,
    pub status: Option<QuoteStatus>,
    pub page: PageRequest,
}
