//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{auth, health, known_faces, reports, settings, stats, users};
use crate::api::metrics::{self, MetricsState};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::infrastructure::database::repositories::Collections;

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
        auth::login,
        auth::get_current_user,
        // Users
        users::list_users,
        users::create_user,
        users::delete_user,
        // Known faces
        known_faces::list_known_faces,
        known_faces::create_known_face,
        known_faces::update_known_face,
        known_faces::delete_known_face,
        // Settings
        settings::get_settings,
        settings::update_settings,
        settings::regenerate_api_key,
        // Reports
        reports::list_scheduled_reports,
        reports::save_scheduled_report,
        reports::generate_report,
        // Stats
        stats::get_dashboard_stats,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserSummary,
            // Users
            users::UserListItem,
            users::CreateUserRequest,
            users::CreatedUserResponse,
            users::MessageResponse,
            // Known faces
            known_faces::KnownFaceDto,
            known_faces::CreateKnownFaceRequest,
            known_faces::UpdateKnownFaceRequest,
            // Settings
            settings::UpdateSettingsRequest,
            settings::SettingsSavedResponse,
            settings::RegeneratedApiKeyResponse,
            // Reports
            reports::ScheduledReportDto,
            reports::SaveScheduledReportRequest,
            reports::GenerateReportRequest,
            reports::GeneratedReportResponse,
            // Stats
            stats::ActivityEntry,
            stats::DashboardSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service availability checks."),
        (name = "Authentication", description = "Login and current-user lookup. The token is returned in the `token` field and passed in the `Authorization: Bearer <token>` header."),
        (name = "Users", description = "Dashboard account management. All routes require the Administrator role."),
        (name = "Known Faces", description = "Registry of faces known to the recognition pipeline."),
        (name = "Settings", description = "Singleton system settings document with general, security and alert sections."),
        (name = "Reports", description = "Scheduled report definitions and ad-hoc report generation."),
        (name = "Stats", description = "Aggregated dashboard statistics over recognition and alert events."),
    ),
    info(
        title = "EyeSpy Surveillance Dashboard API",
        version = "1.0.0",
        description = "REST API for the EyeSpy surveillance dashboard: authentication, \
user management, known-face registry, system settings, scheduled reports and \
dashboard statistics.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    system_uptime: f64,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let collections = Collections::new(db);

    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // ── Per-module handler states ──────────────────────────────────
    let auth_state = auth::AuthHandlerState {
        collections: collections.clone(),
        jwt_config,
    };
    let users_state = users::UsersHandlerState {
        collections: collections.clone(),
    };
    let known_faces_state = known_faces::KnownFacesHandlerState {
        collections: collections.clone(),
    };
    let settings_state = settings::SettingsHandlerState {
        collections: collections.clone(),
    };
    let reports_state = reports::ReportsHandlerState {
        collections: collections.clone(),
    };
    let stats_state = stats::StatsHandlerState {
        collections,
        system_uptime,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Known-face routes (public, matching the shipped access matrix)
    let known_face_routes = Router::new()
        .route(
            "/",
            get(known_faces::list_known_faces).post(known_faces::create_known_face),
        )
        .route(
            "/{id}",
            axum::routing::patch(known_faces::update_known_face)
                .delete(known_faces::delete_known_face),
        )
        .with_state(known_faces_state);

    // User routes (token + Administrator role)
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", delete(users::delete_user))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(users_state);

    // Settings (token for reads; mutation handlers enforce the
    // Administrator role themselves)
    let settings_routes = Router::new()
        .route(
            "/",
            get(settings::get_settings).post(settings::update_settings),
        )
        .route("/regenerate-api-key", post(settings::regenerate_api_key))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(settings_state);

    // Report routes (any authenticated role)
    let report_routes = Router::new()
        .route(
            "/scheduled",
            get(reports::list_scheduled_reports).post(reports::save_scheduled_report),
        )
        .route("/generate", post(reports::generate_report))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reports_state);

    // Stats routes (any authenticated role)
    let stats_routes = Router::new()
        .route("/dashboard", get(stats::get_dashboard_stats))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(stats_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", auth_protected_routes)
        // Known faces
        .nest("/api/known-faces", known_face_routes)
        // Users
        .nest("/api/users", user_routes)
        // Settings
        .nest("/api/settings", settings_routes)
        // Reports
        .nest("/api/reports", report_routes)
        // Stats
        .nest("/api/stats", stats_routes);

    // Prometheus scrape endpoint, present when a recorder is installed
    if let Some(handle) = prometheus_handle {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(MetricsState { handle }),
        );
    }

    router
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
