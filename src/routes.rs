// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, auth, health, user},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Builds the CORS layer from a comma-separated origin list.
/// Unparseable entries are skipped with a warning.
fn cors_layer(origins: &str) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        // Credentials are allowed, so a wildcard origin is not.
        .filter(|origin| *origin != "*")
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Assembles the main application router.
///
/// * `/api/admin` - login is public, everything else needs an admin JWT.
/// * `/api/user` - student registration, question fetch and submission.
/// * `/api/health` and `/` - service info.
pub fn create_router(state: AppState) -> Router {
    let protected_admin = Router::new()
        .route("/config", get(admin::get_config).post(admin::update_config))
        .route(
            "/questions",
            get(admin::list_questions).post(admin::create_question),
        )
        .route("/questions/{id}", delete(admin::delete_question))
        .route(
            "/results",
            get(admin::list_results).delete(admin::delete_all_results),
        )
        .route("/results/{id}", delete(admin::delete_result))
        .route("/dashboard", get(admin::dashboard))
        .route("/dashboard-full", get(admin::dashboard_full))
        .route("/category-stats", get(admin::category_stats))
        .route("/update-category-status", post(admin::update_category_status))
        // Auth runs first, then the admin role check
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
                .layer(middleware::from_fn(admin_middleware)),
        );

    let admin_routes = Router::new()
        .route("/login", post(auth::login))
        .merge(protected_admin);

    let user_routes = Router::new()
        .route("/categories", get(user::available_categories))
        .route("/register", post(user::register))
        .route("/questions/{category}", get(user::get_questions))
        .route("/submit", post(user::submit));

    Router::new()
        .route("/", get(health::index))
        .route("/api/health", get(health::health))
        .nest("/api/admin", admin_routes)
        .nest("/api/user", user_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origin))
        .with_state(state)
}
