//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    ActivateRequest, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo,
};
use crate::application::{NewUser, UserService};
use crate::domain::UserRole;
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or inactive account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let result = state
        .user_service
        .login(&request.email, &request.password)
        .await?;
    ok(result.into())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .user_service
        .register(NewUser {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: UserRole::Klant,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    post,
    path = "/api/auth/activate",
    tag = "Authentication",
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "Account activated and logged in", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Unknown or expired activation token")
    )
)]
pub async fn activate(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<ActivateRequest>,
) -> ApiResult<LoginResponse> {
    let result = state
        .user_service
        .activate(&request.token, &request.password)
        .await?;
    ok(result.into())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<UserInfo> {
    let user = state
        .user_service
        .get_user(&auth_user.actor(), &auth_user.user_id)
        .await?;
    ok(user.into())
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password is wrong")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<String> {
    state
        .user_service
        .change_password(
            &auth_user.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;
    ok("Password changed".to_string())
}
