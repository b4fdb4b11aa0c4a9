//! Listing domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Auto,
    Boot,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Boot => "Boot",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "boot" => Ok(Self::Boot),
            other => Err(DomainError::Validation(format!(
                "Unknown listing type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingStatus {
    #[default]
    Beschikbaar,
    Gereserveerd,
    Verkocht,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beschikbaar => "beschikbaar",
            Self::Gereserveerd => "gereserveerd",
            Self::Verkocht => "verkocht",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beschikbaar" => Ok(Self::Beschikbaar),
            "gereserveerd" => Ok(Self::Gereserveerd),
            "verkocht" => Ok(Self::Verkocht),
            other => Err(DomainError::Validation(format!(
                "Unknown listing status '{}'",
                other
            ))),
        }
    }
}

/// Vehicle or boat offered for sale
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub listing_type: ListingType,
    pub name: String,
    /// Asking price in euro cents
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
    pub status: ListingStatus,
    /// Public URLs of stored images
    pub images: Vec<String>,
    /// Public URLs of stored videos
    pub videos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Every media URL referenced by this listing.
    pub fn media(&self) -> impl Iterator<Item = &String> {
        self.images.iter().chain(self.videos.iter())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    /// Matches name, brand or model
    pub search: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub page: PageRequest,
}
