//! Listing entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum ListingType {
    #[sea_orm(string_value = "Auto")]
    Auto,
    #[sea_orm(string_value = "Boot")]
    Boot,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ListingStatus {
    #[sea_orm(string_value = "beschikbaar")]
    Beschikbaar,
    #[sea_orm(string_value = "gereserveerd")]
    Gereserveerd,
    #[sea_orm(string_value = "verkocht")]
    Verkocht,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub listing_type: ListingType,
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
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: ListingStatus,
    #[sea_orm(column_type = "Text")]
    pub images: String, // JSON array of public URLs
    #[sea_orm(column_type = "Text")]
    pub videos: String, // JSON array of public URLs
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
