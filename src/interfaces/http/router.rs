//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AppointmentService, ListingService, QuoteService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::storage::MediaStorage;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    appointments, auth, health, listings, metrics, quotes, request_id, users,
};

/// Everything the HTTP layer needs, assembled by the server bootstrap.
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub user_service: Arc<UserService>,
    pub listing_service: Arc<ListingService>,
    pub appointment_service: Arc<AppointmentService>,
    pub quote_service: Arc<QuoteService>,
    /// Where uploaded media is served from
    pub media: MediaStorage,
    pub max_upload_bytes: usize,
    /// `None` leaves `/metrics` unmounted
    pub metrics_handle: Option<PrometheusHandle>,
    pub started_at: Arc<Instant>,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::activate,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::resend_activation,
        // Listings
        listings::list_listings,
        listings::get_listing,
        listings::create_listing,
        listings::update_listing,
        listings::delete_listing,
        // Appointments
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::delete_appointment,
        // Quotes
        quotes::list_quotes,
        quotes::get_quote,
        quotes::create_quote,
        quotes::update_quote,
        quotes::respond_to_quote,
        quotes::delete_quote,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<auth::UserInfo>,
            PaginatedResponse<listings::ListingDto>,
            PaginatedResponse<appointments::AppointmentDto>,
            PaginatedResponse<quotes::QuoteDto>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ActivateRequest,
            auth::ChangePasswordRequest,
            auth::UserInfo,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            listings::ListingDto,
            listings::CreateListingRequest,
            listings::UpdateListingRequest,
            appointments::AppointmentDto,
            appointments::CreateAppointmentRequest,
            appointments::UpdateAppointmentRequest,
            quotes::QuoteDto,
            quotes::CreateQuoteRequest,
            quotes::UpdateQuoteRequest,
            quotes::RespondQuoteRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login (JWT), registration, account activation, password change"),
        (name = "Users", description = "Customer and administrator accounts"),
        (name = "Listings", description = "Cars and boats for sale, with photos and videos"),
        (name = "Appointments", description = "Service and viewing appointments"),
        (name = "Quotes", description = "Price proposals and customer answers"),
    ),
    info(
        title = "Dealership API",
        version = "1.0.0",
        description = "Public catalogue, customer area and back office for a car and boat dealership"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };
    let require_auth = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);
    let require_admin = || middleware::from_fn(admin_middleware);

    // Auth: login/register/activate are public
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(require_auth());
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/activate", post(auth::activate))
        .merge(auth_protected_routes)
        .with_state(auth::AuthHandlerState {
            user_service: ctx.user_service.clone(),
        });

    // Users: admin CRUD, self read/update
    let user_admin_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", delete(users::delete_user))
        .route("/{id}/resend-activation", post(users::resend_activation))
        .layer(require_admin());
    let user_routes = Router::new()
        .route("/{id}", get(users::get_user).put(users::update_user))
        .merge(user_admin_routes)
        .layer(require_auth())
        .with_state(users::UserHandlerState {
            user_service: ctx.user_service.clone(),
        });

    // Listings: public reads, admin multipart writes
    let listing_admin_routes = Router::new()
        .route("/", post(listings::create_listing))
        .route(
            "/{id}",
            put(listings::update_listing).delete(listings::delete_listing),
        )
        .layer(DefaultBodyLimit::max(ctx.max_upload_bytes))
        .layer(require_admin())
        .layer(require_auth());
    let listing_routes = Router::new()
        .route("/", get(listings::list_listings))
        .route("/{id}", get(listings::get_listing))
        .merge(listing_admin_routes)
        .with_state(listings::ListingHandlerState {
            listing_service: ctx.listing_service.clone(),
        });

    let appointment_routes = Router::new()
        .route(
            "/",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/{id}",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .layer(require_auth())
        .with_state(appointments::AppointmentHandlerState {
            appointment_service: ctx.appointment_service.clone(),
        });

    // Quotes: the owner answers, everything else is checked in the service
    let quote_routes = Router::new()
        .route("/", get(quotes::list_quotes).post(quotes::create_quote))
        .route(
            "/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route("/{id}/status", patch(quotes::respond_to_quote))
        .layer(require_auth())
        .with_state(quotes::QuoteHandlerState {
            quote_service: ctx.quote_service.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: ctx.started_at.clone(),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/listings", listing_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/quotes", quote_routes)
        .nest_service(ctx.media.public_path(), ServeDir::new(ctx.media.root()));

    if let Some(handle) = ctx.metrics_handle.clone() {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/auth/login",
            "/api/auth/activate",
            "/api/users/{id}/resend-activation",
            "/api/listings/{id}",
            "/api/appointments",
            "/api/quotes/{id}/status",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
