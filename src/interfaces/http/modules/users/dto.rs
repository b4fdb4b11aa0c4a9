//! User DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{GetUserDto, UpdateUserDto, UserRole};
use crate::interfaces::http::common::ApiError;
use crate::shared::PageRequest;

/// Create user request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub last_name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// `admin` or `klant` (default)
    pub role: Option<String>,
}

/// Update user request; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    /// Empty string clears the phone number
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> Result<UpdateUserDto, ApiError> {
        Ok(UpdateUserDto {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            role: parse_role(self.role.as_deref())?,
            is_active: self.is_active,
        })
    }
}

/// List users query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Matches email, first name or last name
    pub search: Option<String>,
    /// `admin` or `klant`
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListUsersParams {
    pub fn into_query(self) -> Result<GetUserDto, ApiError> {
        Ok(GetUserDto {
            search: self.search.filter(|s| !s.trim().is_empty()),
            role: parse_role(self.role.as_deref())?,
            page: PageRequest::new(self.page, self.limit),
        })
    }
}

pub(crate) fn parse_role(raw: Option<&str>) -> Result<Option<UserRole>, ApiError> {
    raw.filter(|r| !r.trim().is_empty())
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(ApiError::from)
}
