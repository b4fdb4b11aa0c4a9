//! Quote API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateQuoteRequest, ListQuotesParams, QuoteDto, RespondQuoteRequest, UpdateQuoteRequest,
};
use crate::application::QuoteService;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct QuoteHandlerState {
    pub quote_service: Arc<QuoteService>,
}

#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    params(ListQuotesParams),
    responses(
        (status = 200, description = "Quotes visible to the caller", body = ApiResponse<PaginatedResponse<QuoteDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_quotes(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListQuotesParams>,
) -> ApiResult<PaginatedResponse<QuoteDto>> {
    let (user_id, status, page) = params.into_parts()?;
    let result = state
        .quote_service
        .list(&auth_user.actor(), user_id, status, page)
        .await?;
    ok(result.into())
}

#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = String, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote details", body = ApiResponse<QuoteDto>),
        (status = 403, description = "Not your quote"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_quote(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<QuoteDto> {
    let quote = state.quote_service.get(&auth_user.actor(), &id).await?;
    ok(quote.into())
}

#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created; customer emailed", body = ApiResponse<QuoteDto>),
        (status = 400, description = "Neither userId nor email supplied"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_quote(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuoteDto>>), ApiError> {
    let quote = state
        .quote_service
        .create(&auth_user.actor(), request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(quote.into()))))
}

#[utoipa::path(
    put,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = String, Path, description = "Quote ID")),
    request_body = UpdateQuoteRequest,
    responses(
        (status = 200, description = "Quote updated", body = ApiResponse<QuoteDto>),
        (status = 403, description = "Accepting or rejecting is up to the customer"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_quote(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateQuoteRequest>,
) -> ApiResult<QuoteDto> {
    let quote = state
        .quote_service
        .update(&auth_user.actor(), &id, request.into_changes()?)
        .await?;
    ok(quote.into())
}

#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    params(("id" = String, Path, description = "Quote ID")),
    request_body = RespondQuoteRequest,
    responses(
        (status = 200, description = "Quote answered", body = ApiResponse<QuoteDto>),
        (status = 403, description = "Only the owning customer may answer"),
        (status = 409, description = "Quote is no longer pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn respond_to_quote(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<RespondQuoteRequest>,
) -> ApiResult<QuoteDto> {
    let quote = state
        .quote_service
        .respond(&auth_user.actor(), &id, request.status()?)
        .await?;
    ok(quote.into())
}

#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = String, Path, description = "Quote ID")),
    responses(
        (status = 204, description = "Quote deleted"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_quote(
    State(state): State<QuoteHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.quote_service.delete(&auth_user.actor(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
