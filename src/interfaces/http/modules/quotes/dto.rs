//! Quote DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{NewQuote, QuoteChanges};
use crate::domain::{Quote, QuoteStatus};
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::modules::appointments::dto::guest_from_form;
use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteDto {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    /// `in afwachting`, `geaccepteerd` or `geweigerd`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteDto {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id,
            user_id: q.user_id,
            subject: q.subject,
            amount_cents: q.amount_cents,
            description: q.description,
            status: q.status.to_string(),
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Addressed to `userId`, or to `email` (an account is provisioned when unknown)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200, message = "subject must be 1-200 characters"))]
    pub subject: String,
    #[validate(range(min = 0, message = "amount must not be negative"))]
    pub amount_cents: i64,
    pub description: Option<String>,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(r: CreateQuoteRequest) -> Self {
        Self {
            user_id: r.user_id.filter(|id| !id.trim().is_empty()),
            guest: guest_from_form(r.email, r.first_name, r.last_name, r.phone),
            subject: r.subject,
            amount_cents: r.amount_cents,
            description: r.description,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuoteRequest {
    #[validate(length(min = 1, max = 200, message = "subject must be 1-200 characters"))]
    pub subject: Option<String>,
    #[validate(range(min = 0, message = "amount must not be negative"))]
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
    /// Only `in afwachting` is accepted from an admin
    pub status: Option<String>,
}

impl UpdateQuoteRequest {
    pub fn into_changes(self) -> Result<QuoteChanges, ApiError> {
        Ok(QuoteChanges {
            subject: self.subject,
            amount_cents: self.amount_cents,
            description: self.description,
            status: parse_status(self.status.as_deref())?,
        })
    }
}

/// Customer answer to a pending quote
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RespondQuoteRequest {
    /// `geaccepteerd` or `geweigerd`
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

impl RespondQuoteRequest {
    pub fn status(&self) -> Result<QuoteStatus, ApiError> {
        Ok(self.status.parse()?)
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<QuoteStatus>, DomainError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse::<QuoteStatus>)
        .transpose()
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuotesParams {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuotesParams {
    pub fn into_parts(self) -> Result<(Option<String>, Option<QuoteStatus>, PageRequest), ApiError> {
        Ok((
            self.user_id.filter(|id| !id.trim().is_empty()),
            parse_status(self.status.as_deref())?,
            PageRequest::new(self.page, self.limit),
        ))
    }
}
