//! SeaORM implementation of ListingRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, Listing, ListingFilter, ListingRepository, ListingStatus,
    ListingType,
};
use crate::infrastructure::database::entities::listing;
use crate::shared::PaginatedResult;

// ── Conversion helpers ──────────────────────────────────────────

fn type_to_entity(t: ListingType) -> listing::ListingType {
    match t {
        ListingType::Auto => listing::ListingType::Auto,
        ListingType::Boot => listing::ListingType::Boot,
    }
}

fn status_to_entity(s: ListingStatus) -> listing::ListingStatus {
    match s {
        ListingStatus::Beschikbaar => listing::ListingStatus::Beschikbaar,
        ListingStatus::Gereserveerd => listing::ListingStatus::Gereserveerd,
        ListingStatus::Verkocht => listing::ListingStatus::Verkocht,
    }
}

fn entity_to_domain(m: listing::Model) -> DomainResult<Listing> {
    Ok(Listing {
        id: m.id,
        listing_type: match m.listing_type {
            listing::ListingType::Auto => ListingType::Auto,
            listing::ListingType::Boot => ListingType::Boot,
        },
        name: m.name,
        price_cents: m.price_cents,
        brand: m.brand,
        model: m.model,
        year: m.year,
        mileage_km: m.mileage_km,
        operating_hours: m.operating_hours,
        fuel_type: m.fuel_type,
        transmission: m.transmission,
        color: m.color,
        power_hp: m.power_hp,
        length_cm: m.length_cm,
        description: m.description,
        status: match m.status {
            listing::ListingStatus::Beschikbaar => ListingStatus::Beschikbaar,
            listing::ListingStatus::Gereserveerd => ListingStatus::Gereserveerd,
            listing::ListingStatus::Verkocht => ListingStatus::Verkocht,
        },
        images: serde_json::from_str(&m.images)?,
        videos: serde_json::from_str(&m.videos)?,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn to_active_model(l: Listing) -> DomainResult<listing::ActiveModel> {
    Ok(listing::ActiveModel {
        id: Set(l.id),
        listing_type: Set(type_to_entity(l.listing_type)),
        name: Set(l.name),
        price_cents: Set(l.price_cents),
        brand: Set(l.brand),
        model: Set(l.model),
        year: Set(l.year),
        mileage_km: Set(l.mileage_km),
        operating_hours: Set(l.operating_hours),
        fuel_type: Set(l.fuel_type),
        transmission: Set(l.transmission),
        color: Set(l.color),
        power_hp: Set(l.power_hp),
        length_cm: Set(l.length_cm),
        description: Set(l.description),
        status: Set(status_to_entity(l.status)),
        images: Set(serde_json::to_string(&l.images)?),
        videos: Set(serde_json::to_string(&l.videos)?),
        created_at: Set(l.created_at),
        updated_at: Set(l.updated_at),
    })
}

// ── SeaOrmListingRepository ─────────────────────────────────────

pub struct SeaOrmListingRepository {
    db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Listing>> {
        listing::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(entity_to_domain)
            .transpose()
    }

    async fn list(&self, filter: ListingFilter) -> DomainResult<PaginatedResult<Listing>> {
        let mut query = listing::Entity::find();

        if let Some(t) = filter.listing_type {
            query = query.filter(listing::Column::ListingType.eq(type_to_entity(t)));
        }
        if let Some(s) = filter.status {
            query = query.filter(listing::Column::Status.eq(status_to_entity(s)));
        }
        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.filter(
                Condition::any()
                    .add(listing::Column::Name.contains(search))
                    .add(listing::Column::Brand.contains(search))
                    .add(listing::Column::Model.contains(search)),
            );
        }
        if let Some(min) = filter.min_price_cents {
            query = query.filter(listing::Column::PriceCents.gte(min));
        }
        if let Some(max) = filter.max_price_cents {
            query = query.filter(listing::Column::PriceCents.lte(max));
        }

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(listing::Column::CreatedAt)
            .offset(filter.page.offset())
            .limit(u64::from(filter.page.limit))
            .all(&self.db)
            .await?;

        let items = models
            .into_iter()
            .map(entity_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, filter.page))
    }

    async fn save(&self, l: Listing) -> DomainResult<Listing> {
        let result = to_active_model(l)?.insert(&self.db).await?;
        info!("Listing saved: {} ({})", result.name, result.id);
        entity_to_domain(result)
    }

    async fn update(&self, mut l: Listing) -> DomainResult<Listing> {
        let existing = listing::Entity::find_by_id(l.id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", &l.id))?;

        l.created_at = existing.created_at;
        l.updated_at = Utc::now();

        let result = to_active_model(l)?.update(&self.db).await?;
        entity_to_domain(result)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = listing::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Listing", id));
        }

        info!("Listing deleted: {}", id);
        Ok(())
    }
}
