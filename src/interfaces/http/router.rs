//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, MessageData, PaginatedResponse};
use super::middleware::{auth_middleware, restricted, AuthState, ADMINS, CUSTOMERS, STAFF};
use super::modules::{auth, complaints, health, metrics, request_id, users};
use crate::application::{AnalyticsService, ComplaintService, SharedEventBus, UserService};
use crate::interfaces::ws::{ws_notifications_handler, NotificationState};

/// Everything the HTTP layer needs from the rest of the application
#[derive(Clone)]
pub struct ApiDependencies {
    pub db: DatabaseConnection,
    pub users: Arc<UserService>,
    pub complaints: Arc<ComplaintService>,
    pub analytics: Arc<AnalyticsService>,
    pub event_bus: SharedEventBus,
    pub metrics: PrometheusHandle,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
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
                        .description(Some("JWT Bearer token"))
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
        auth::register,
        auth::login,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::create_user,
        users::list_technicians,
        users::list_users,
        users::toggle_user_status,
        // Complaints
        complaints::create_complaint,
        complaints::list_complaints,
        complaints::list_all_complaints,
        complaints::get_complaint,
        complaints::assign_complaint,
        complaints::update_complaint_status,
        complaints::get_analytics,
        complaints::list_notes,
        complaints::add_note,
    ),
    components(
        schemas(
            // Common
            ApiResponse<MessageData>,
            MessageData,
            PaginatedResponse<complaints::ComplaintDto>,
            PaginatedResponse<auth::UserInfo>,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ChangePasswordRequest,
            auth::AuthResponse,
            auth::UserInfo,
            // Users
            users::CreateUserRequest,
            users::ToggleStatusResponse,
            // Complaints
            complaints::CreateComplaintRequest,
            complaints::AssignComplaintRequest,
            complaints::UpdateStatusRequest,
            complaints::CreateNoteRequest,
            complaints::ComplaintDto,
            complaints::UserSummaryDto,
            complaints::NoteDto,
            complaints::AnalyticsDto,
            complaints::OverviewDto,
            complaints::CategoryCount,
            complaints::PriorityCount,
            complaints::MonthlyCountDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Registration, login (JWT), profile, password change"),
        (name = "Users", description = "Staff accounts and account status (admin)"),
        (name = "Complaints", description = "Filing, triage, status updates, notes and analytics"),
    ),
    info(
        title = "Complaint Desk API",
        version = "1.0.0",
        description = "Role-based complaint tracking: customers file, technicians resolve, admins triage",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Create the application router with all routes
pub fn create_api_router(deps: ApiDependencies) -> Router {
    let auth_state = AuthState {
        users: deps.users.clone(),
    };
    let require_auth = middleware::from_fn_with_state(auth_state, auth_middleware);

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState {
        users: deps.users.clone(),
    };

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());

    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(require_auth.clone())
        .with_state(auth_handler_state);

    // ── Users (admin) ──────────────────────────────────────────
    let user_routes = Router::new()
        .route("/", restricted(get(users::list_users), ADMINS))
        .route("/create", restricted(post(users::create_user), ADMINS))
        .route("/technicians", restricted(get(users::list_technicians), ADMINS))
        .route(
            "/{id}/toggle-status",
            restricted(put(users::toggle_user_status), ADMINS),
        )
        .layer(require_auth.clone())
        .with_state(users::UserHandlerState {
            users: deps.users.clone(),
        });

    // ── Complaints ─────────────────────────────────────────────
    let complaint_routes = Router::new()
        .route(
            "/",
            get(complaints::list_complaints)
                .merge(restricted(post(complaints::create_complaint), CUSTOMERS)),
        )
        .route("/all", restricted(get(complaints::list_all_complaints), ADMINS))
        .route("/analytics", restricted(get(complaints::get_analytics), ADMINS))
        .route("/{id}", get(complaints::get_complaint))
        .route(
            "/{id}/assign",
            restricted(put(complaints::assign_complaint), ADMINS),
        )
        .route(
            "/{id}/status",
            restricted(put(complaints::update_complaint_status), STAFF),
        )
        .route(
            "/{id}/notes",
            get(complaints::list_notes).post(complaints::add_note),
        )
        .layer(require_auth)
        .with_state(complaints::ComplaintHandlerState {
            complaints: deps.complaints.clone(),
            analytics: deps.analytics.clone(),
        });

    // ── Notifications (token in the query string) ──────────────
    let notification_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(NotificationState {
            event_bus: deps.event_bus.clone(),
            users: deps.users.clone(),
        });

    // ── Health & metrics (public) ──────────────────────────────
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: deps.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: deps.metrics.clone(),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let api = Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/auth", auth_protected_routes)
        .nest("/users", user_routes)
        .nest("/complaints", complaint_routes)
        .nest("/notifications", notification_routes);

    Router::new()
        .merge(swagger_routes)
        .merge(metrics_routes)
        .nest("/api", api)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(&deps.cors_origins))
        .layer(TraceLayer::new_for_http())
}
