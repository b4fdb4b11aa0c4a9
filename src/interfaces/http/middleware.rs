//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::Actor;
use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// `None` when the token carries a role this service does not issue.
    pub fn from_claims(claims: TokenClaims) -> Option<Self> {
        let role = claims.role.parse().ok()?;
        Some(Self {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.role)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            return match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    auth_error_response(AuthError::ExpiredToken)
                }
                _ => auth_error_response(AuthError::InvalidToken),
            };
        }
    };
    if claims.is_expired() {
        return auth_error_response(AuthError::ExpiredToken);
    }

    let Some(user) = AuthenticatedUser::from_claims(claims) else {
        return auth_error_response(AuthError::InvalidToken);
    };
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Must run after `auth_middleware`.
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::{create_token, DEFAULT_ISSUER};
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test".into(),
            expiration_hours: 1,
            issuer: DEFAULT_ISSUER.into(),
        }
    }

    fn app() -> Router {
        let state = AuthState { jwt_config: jwt() };
        let admin = Router::new()
            .route("/admin", get(|| async { "admin" }))
            .layer(middleware::from_fn(admin_middleware));
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthenticatedUser>| async move { user.email }),
            )
            .merge(admin)
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(path: &str, token: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        app()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn missing_or_garbage_token_is_401() {
        assert_eq!(call("/me", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("/me", Some("nope")).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn customer_token_passes_auth_but_not_admin() {
        let token = create_token("u1", "klant@example.nl", "klant", &jwt()).unwrap();
        assert_eq!(call("/me", Some(&token)).await, StatusCode::OK);
        assert_eq!(call("/admin", Some(&token)).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_token_reaches_admin_routes() {
        let token = create_token("a1", "admin@example.nl", "admin", &jwt()).unwrap();
        assert_eq!(call("/admin", Some(&token)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let token = create_token("x", "x@example.nl", "operator", &jwt()).unwrap();
        assert_eq!(call("/me", Some(&token)).await, StatusCode::UNAUTHORIZED);
    }
}
