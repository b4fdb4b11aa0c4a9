//! Listing DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{ListingChanges, NewListing};
use crate::domain::{Listing, ListingFilter, ListingStatus, ListingType};
use crate::interfaces::http::common::ApiError;
use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDto {
    pub id: String,
    /// `Auto` or `Boot`
    pub listing_type: String,
    pub name: String,
    pub price_cents: i64,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage_km: Option<i32>,
    pub operating_hours: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub power_hp: Option<i32>,
    pub length_cm: Option<i32>,
    pub description: Option<String>,
    pub status: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingDto {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            listing_type: l.listing_type.to_string(),
            name: l.name,
            price_cents: l.price_cents,
            brand: l.brand,
            model: l.model,
            year: l.year,
            mileage_km: l.mileage_km,
            operating_hours: l.operating_hours,
            fuel_type: l.fuel_type,
            transmission: l.transmission,
            color: l.color,
            power_hp: l.power_hp,
            length_cm: l.length_cm,
            description: l.description,
            status: l.status.to_string(),
            images: l.images,
            videos: l.videos,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Content of the `json` part of a create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    #[serde(alias = "type")]
    pub listing_type: String,
    #[validate(length(min = 1, max = 150, message = "name must be 1-150 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price_cents: i64,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage_km: Option<i32>,
    #[validate(range(min = 0))]
    pub operating_hours: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub power_hp: Option<i32>,
    #[validate(range(min = 0))]
    pub length_cm: Option<i32>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl CreateListingRequest {
    pub fn into_new_listing(self) -> Result<NewListing, ApiError> {
        Ok(NewListing {
            listing_type: self.listing_type.parse()?,
            name: self.name,
            price_cents: self.price_cents,
            brand: self.brand,
            model: self.model,
            year: self.year,
            mileage_km: self.mileage_km,
            operating_hours: self.operating_hours,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            color: self.color,
            power_hp: self.power_hp,
            length_cm: self.length_cm,
            description: self.description,
            status: parse_status(self.status.as_deref())?,
        })
    }
}

/// Content of the `json` part of an update request.
///
/// `images` / `videos` list the existing URLs to keep; omit them to keep all.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateListingRequest {
    #[serde(alias = "type")]
    pub listing_type: Option<String>,
    #[validate(length(min = 1, max = 150, message = "name must be 1-150 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price_cents: Option<i64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage_km: Option<i32>,
    #[validate(range(min = 0))]
    pub operating_hours: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub power_hp: Option<i32>,
    #[validate(range(min = 0))]
    pub length_cm: Option<i32>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

impl UpdateListingRequest {
    pub fn into_changes(self) -> Result<ListingChanges, ApiError> {
        Ok(ListingChanges {
            listing_type: self
                .listing_type
                .as_deref()
                .map(str::parse::<ListingType>)
                .transpose()?,
            name: self.name,
            price_cents: self.price_cents,
            brand: self.brand,
            model: self.model,
            year: self.year,
            mileage_km: self.mileage_km,
            operating_hours: self.operating_hours,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            color: self.color,
            power_hp: self.power_hp,
            length_cm: self.length_cm,
            description: self.description,
            status: parse_status(self.status.as_deref())?,
            images: self.images,
            videos: self.videos,
        })
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<ListingStatus>, DomainError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse::<ListingStatus>)
        .transpose()
}

/// Listing search parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListListingsParams {
    /// `Auto` or `Boot`
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    /// `beschikbaar`, `gereserveerd` or `verkocht`
    pub status: Option<String>,
    /// Matches name, brand or model
    pub search: Option<String>,
    /// Lower price bound in euro cents
    pub min_price: Option<i64>,
    /// Upper price bound in euro cents
    pub max_price: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListListingsParams {
    pub fn into_filter(self) -> Result<ListingFilter, ApiError> {
        Ok(ListingFilter {
            listing_type: self
                .listing_type
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(str::parse::<ListingType>)
                .transpose()?,
            status: parse_status(self.status.as_deref())?,
            search: self.search.filter(|s| !s.trim().is_empty()),
            min_price_cents: self.min_price,
            max_price_cents: self.max_price,
            page: PageRequest::new(self.page, self.limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_alias_is_accepted_in_payload() {
        let req: CreateListingRequest = serde_json::from_str(
            r#"{"type": "boot", "name": "Sloep 650", "price_cents": 1850000}"#,
        )
        .unwrap();
        let listing = req.into_new_listing().unwrap();
        assert_eq!(listing.listing_type, ListingType::Boot);
        assert_eq!(listing.status, None);
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        let params = ListListingsParams {
            status: Some("weg".into()),
            ..Default::default()
        };
        assert!(params.into_filter().is_err());
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = ListListingsParams {
            listing_type: Some(" ".into()),
            search: Some("".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter.listing_type.is_none());
        assert!(filter.search.is_none());
    }
}
