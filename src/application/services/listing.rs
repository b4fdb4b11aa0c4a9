//! Listing catalogue and its media files

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::access::Actor;
use crate::domain::{
    DomainError, DomainResult, Listing, ListingFilter, ListingStatus, ListingType,
    RepositoryProvider,
};
use crate::infrastructure::storage::{MediaKind, MediaStorage, StoredMedia};
use crate::shared::PaginatedResult;

use super::required_text;

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub kind: MediaKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NewListing {
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
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
}

/// Partial update. `images`/`videos` list the existing URLs to keep;
/// `None` keeps them all.
#[derive(Debug, Clone, Default)]
pub struct ListingChanges {
    pub listing_type: Option<ListingType>,
    pub name: Option<String>,
    pub price_cents: Option<i64>,
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
    pub status: Option<ListingStatus>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

/// Empty strings clear optional text fields.
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Keep the requested URLs that the listing actually owns, in request order.
fn retain_owned(requested: Vec<String>, owned: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .into_iter()
        .filter(|url| owned.contains(url) && seen.insert(url.clone()))
        .collect()
}

pub struct ListingService {
    repos: Arc<dyn RepositoryProvider>,
    media: MediaStorage,
}

impl ListingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, media: MediaStorage) -> Self {
        Self { repos, media }
    }

    pub async fn list(&self, filter: ListingFilter) -> DomainResult<PaginatedResult<Listing>> {
        self.repos.listings().list(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Listing> {
        self.repos
            .listings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Listing", id))
    }

    /// Validate every upload first, then write them all. If a write fails the
    /// files already written are removed.
    async fn store_uploads(&self, uploads: Vec<MediaUpload>) -> DomainResult<Vec<StoredMedia>> {
        for upload in &uploads {
            upload.kind.extension_of(&upload.file_name)?;
        }

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self
                .media
                .save(upload.kind, &upload.file_name, &upload.bytes)
                .await
            {
                Ok(file) => stored.push(file),
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    async fn discard(&self, files: &[StoredMedia]) {
        for file in files {
            self.media.delete(&file.url).await;
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: NewListing,
        uploads: Vec<MediaUpload>,
    ) -> DomainResult<Listing> {
        actor.require_admin()?;
        let name = required_text("name", &input.name)?;

        let stored = self.store_uploads(uploads).await?;
        let (images, videos) = split_by_kind(&stored);
        let now = Utc::now();

        let listing = Listing {
            id: uuid::Uuid::new_v4().to_string(),
            listing_type: input.listing_type,
            name,
            price_cents: input.price_cents,
            brand: input.brand.and_then(non_empty),
            model: input.model.and_then(non_empty),
            year: input.year,
            mileage_km: input.mileage_km,
            operating_hours: input.operating_hours,
            fuel_type: input.fuel_type.and_then(non_empty),
            transmission: input.transmission.and_then(non_empty),
            color: input.color.and_then(non_empty),
            power_hp: input.power_hp,
            length_cm: input.length_cm,
            description: input.description.and_then(non_empty),
            status: input.status.unwrap_or_default(),
            images,
            videos,
            created_at: now,
            updated_at: now,
        };

        match self.repos.listings().save(listing).await {
            Ok(saved) => {
                info!(listing_id = %saved.id, media = stored.len(), "Listing created");
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "Listing insert failed, removing uploaded files");
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: ListingChanges,
        uploads: Vec<MediaUpload>,
    ) -> DomainResult<Listing> {
        actor.require_admin()?;

        let name = changes
            .name
            .as_deref()
            .map(|n| required_text("name", n))
            .transpose()?;
        let existing = self.get(id).await?;
        let previous_media: Vec<String> = existing.media().cloned().collect();

        let stored = self.store_uploads(uploads).await?;
        let (new_images, new_videos) = split_by_kind(&stored);

        let mut listing = existing.clone();
        listing.images = match changes.images {
            Some(keep) => retain_owned(keep, &existing.images),
            None => existing.images.clone(),
        };
        listing.videos = match changes.videos {
            Some(keep) => retain_owned(keep, &existing.videos),
            None => existing.videos.clone(),
        };
        listing.images.extend(new_images);
        listing.videos.extend(new_videos);

        if let Some(v) = changes.listing_type {
            listing.listing_type = v;
        }
        if let Some(v) = name {
            listing.name = v;
        }
        if let Some(v) = changes.price_cents {
            listing.price_cents = v;
        }
        if let Some(v) = changes.brand {
            listing.brand = non_empty(v);
        }
        if let Some(v) = changes.model {
            listing.model = non_empty(v);
        }
        if changes.year.is_some() {
            listing.year = changes.year;
        }
        if changes.mileage_km.is_some() {
            listing.mileage_km = changes.mileage_km;
        }
        if changes.operating_hours.is_some() {
            listing.operating_hours = changes.operating_hours;
        }
        if let Some(v) = changes.fuel_type {
            listing.fuel_type = non_empty(v);
        }
        if let Some(v) = changes.transmission {
            listing.transmission = non_empty(v);
        }
        if let Some(v) = changes.color {
            listing.color = non_empty(v);
        }
        if changes.power_hp.is_some() {
            listing.power_hp = changes.power_hp;
        }
        if changes.length_cm.is_some() {
            listing.length_cm = changes.length_cm;
        }
        if let Some(v) = changes.description {
            listing.description = non_empty(v);
        }
        if let Some(v) = changes.status {
            listing.status = v;
        }

        let updated = match self.repos.listings().update(listing).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!(
                    listing_id = %id,
                    error = %e,
                    "Listing update failed, removing uploaded files"
                );
                self.discard(&stored).await;
                return Err(e);
            }
        };

        let removed: Vec<String> = {
            let kept: HashSet<&String> = updated.media().collect();
            previous_media
                .into_iter()
                .filter(|u| !kept.contains(u))
                .collect()
        };
        self.media.delete_all(&removed).await;

        info!(
            listing_id = %updated.id,
            added = stored.len(),
            removed = removed.len(),
            "Listing updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;

        let existing = self.get(id).await?;
        self.repos.listings().delete(id).await?;
        let urls: Vec<String> = existing.media().cloned().collect();
        self.media.delete_all(&urls).await;

        info!(listing_id = %id, "Listing deleted");
        Ok(())
    }
}

fn split_by_kind(stored: &[StoredMedia]) -> (Vec<String>, Vec<String>) {
    let urls = |kind: MediaKind| -> Vec<String> {
        stored
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.url.clone())
            .collect()
    };
    (urls(MediaKind::Image), urls(MediaKind::Video))
}
