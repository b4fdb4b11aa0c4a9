//! Appointment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{AppointmentChanges, GuestDetails, NewAppointment};
use crate::domain::{Appointment, AppointmentStatus};
use crate::interfaces::http::common::ApiError;
use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentDto {
    pub id: String,
    pub user_id: String,
    pub service_type: String,
    pub requested_date: DateTime<Utc>,
    pub notes: Option<String>,
    /// `in afwachting`, `bevestigd`, `geannuleerd` or `voltooid`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            service_type: a.service_type,
            requested_date: a.requested_date,
            notes: a.notes,
            status: a.status.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Guest details from an admin form; `None` when no email was given.
pub(crate) fn guest_from_form(
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
) -> Option<GuestDetails> {
    let email = email.filter(|e| !e.trim().is_empty())?;
    Some(GuestDetails {
        email,
        first_name,
        last_name,
        phone,
    })
}

/// Admins book for `userId` or for `email` (an account is provisioned when unknown).
/// Customers always book for themselves and these fields are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
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
    #[validate(length(min = 1, max = 100, message = "service_type must be 1-100 characters"))]
    pub service_type: String,
    pub requested_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<CreateAppointmentRequest> for NewAppointment {
    fn from(r: CreateAppointmentRequest) -> Self {
        Self {
            user_id: r.user_id.filter(|id| !id.trim().is_empty()),
            guest: guest_from_form(r.email, r.first_name, r.last_name, r.phone),
            service_type: r.service_type,
            requested_date: r.requested_date,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1, max = 100, message = "service_type must be 1-100 characters"))]
    pub service_type: Option<String>,
    pub requested_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn into_changes(self) -> Result<AppointmentChanges, ApiError> {
        Ok(AppointmentChanges {
            service_type: self.service_type,
            requested_date: self.requested_date,
            notes: self.notes,
            status: parse_status(self.status.as_deref())?,
        })
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<AppointmentStatus>, DomainError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse::<AppointmentStatus>)
        .transpose()
}

/// Customers only ever see their own rows; `userId` is honoured for admins.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListAppointmentsParams {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListAppointmentsParams {
    pub fn into_parts(
        self,
    ) -> Result<(Option<String>, Option<AppointmentStatus>, PageRequest), ApiError> {
        Ok((
            self.user_id.filter(|id| !id.trim().is_empty()),
            parse_status(self.status.as_deref())?,
            PageRequest::new(self.page, self.limit),
        ))
    }
}
