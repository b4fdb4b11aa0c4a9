//! Appointment API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    AppointmentDto, CreateAppointmentRequest, ListAppointmentsParams, UpdateAppointmentRequest,
};
use crate::application::AppointmentService;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AppointmentHandlerState {
    pub appointment_service: Arc<AppointmentService>,
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    params(ListAppointmentsParams),
    responses(
        (status = 200, description = "Appointments visible to the caller", body = ApiResponse<PaginatedResponse<AppointmentDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    State(state): State<AppointmentHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListAppointmentsParams>,
) -> ApiResult<PaginatedResponse<AppointmentDto>> {
    let (user_id, status, page) = params.into_parts()?;
    let result = state
        .appointment_service
        .list(&auth_user.actor(), user_id, status, page)
        .await?;
    ok(result.into())
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment details", body = ApiResponse<AppointmentDto>),
        (status = 403, description = "Not your appointment"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_appointment(
    State(state): State<AppointmentHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<AppointmentDto> {
    let appointment = state
        .appointment_service
        .get(&auth_user.actor(), &id)
        .await?;
    ok(appointment.into())
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked; email queued", body = ApiResponse<AppointmentDto>),
        (status = 400, description = "Admin supplied neither userId nor email")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_appointment(
    State(state): State<AppointmentHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentDto>>), ApiError> {
    let appointment = state
        .appointment_service
        .create(&auth_user.actor(), request.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(appointment.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = ApiResponse<AppointmentDto>),
        (status = 403, description = "Change not allowed for this caller"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment can no longer be cancelled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment(
    State(state): State<AppointmentHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateAppointmentRequest>,
) -> ApiResult<AppointmentDto> {
    let appointment = state
        .appointment_service
        .update(&auth_user.actor(), &id, request.into_changes()?)
        .await?;
    ok(appointment.into())
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 403, description = "Not your appointment"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_appointment(
    State(state): State<AppointmentHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .appointment_service
        .delete(&auth_user.actor(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
