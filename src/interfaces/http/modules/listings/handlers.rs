//! Listing API handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateListingRequest, ListListingsParams, ListingDto, UpdateListingRequest};
use super::multipart::read_listing_form;
use crate::application::ListingService;
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, PaginatedResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ListingHandlerState {
    pub listing_service: Arc<ListingService>,
}

#[utoipa::path(
    get,
    path = "/api/listings",
    tag = "Listings",
    params(ListListingsParams),
    responses(
        (status = 200, description = "Listings, newest first", body = ApiResponse<PaginatedResponse<ListingDto>>),
        (status = 400, description = "Unknown type or status")
    )
)]
pub async fn list_listings(
    State(state): State<ListingHandlerState>,
    Query(params): Query<ListListingsParams>,
) -> ApiResult<PaginatedResponse<ListingDto>> {
    let result = state.listing_service.list(params.into_filter()?).await?;
    ok(result.into())
}

#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    tag = "Listings",
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ApiResponse<ListingDto>),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<ListingHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<ListingDto> {
    let listing = state.listing_service.get(&id).await?;
    ok(listing.into())
}

/// Multipart: `json` (listing fields) plus any number of `images` / `videos` files.
#[utoipa::path(
    post,
    path = "/api/listings",
    tag = "Listings",
    request_body(content = CreateListingRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<ListingDto>),
        (status = 400, description = "Bad form or unsupported file type"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_listing(
    State(state): State<ListingHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ListingDto>>), ApiError> {
    let (request, uploads) = read_listing_form::<CreateListingRequest>(multipart).await?;
    let listing = state
        .listing_service
        .create(&auth_user.actor(), request.into_new_listing()?, uploads)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(listing.into()))))
}

#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    tag = "Listings",
    params(("id" = String, Path, description = "Listing ID")),
    request_body(content = UpdateListingRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<ListingDto>),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_listing(
    State(state): State<ListingHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ListingDto> {
    let (request, uploads) = read_listing_form::<UpdateListingRequest>(multipart).await?;
    let listing = state
        .listing_service
        .update(&auth_user.actor(), &id, request.into_changes()?, uploads)
        .await?;
    ok(listing.into())
}

#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    tag = "Listings",
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing and its media deleted"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_listing(
    State(state): State<ListingHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .listing_service
        .delete(&auth_user.actor(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
