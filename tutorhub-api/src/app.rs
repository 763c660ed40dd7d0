/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use tutorhub_api::{app::{build_router, AppState}, config::Config};
/// use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tutorhub_shared::auth::middleware::{jwt_auth_middleware, AuthError};
use tutorhub_shared::services::Services;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks)
    pub db: SqlitePool,

    /// Domain services
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let services = Services::new(db.clone(), config.hashing());
        Self {
            db,
            services,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token validation
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # public
/// └── /v1/                             # bearer JWT required
///     ├── /users                       # admin; promote: any role, bounded by caller
///     ├── /packages                    # admin
///     ├── /businesses                  # admin
///     │   ├── /:id/status, /:id/package
///     │   └── /bulk/status, /bulk/package
///     ├── /teachers                    # business or admin
///     └── /students                    # business or admin
/// ```
///
/// # Middleware Stack
///
/// 1. Authentication on `/v1` (JWT into `AuthContext`)
/// 2. Request spans (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route(
            "/",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route("/:id", get(routes::users::get_user))
        .route("/:id/promote", post(routes::users::promote_user));

    let package_routes = Router::new()
        .route(
            "/",
            post(routes::packages::create_package).get(routes::packages::list_packages),
        )
        .route(
            "/:id",
            get(routes::packages::get_package)
                .put(routes::packages::update_package)
                .delete(routes::packages::delete_package),
        );

    let business_routes = Router::new()
        .route(
            "/",
            post(routes::businesses::create_business).get(routes::businesses::list_businesses),
        )
        .route("/bulk/status", post(routes::businesses::bulk_status))
        .route("/bulk/package", post(routes::businesses::bulk_package))
        .route(
            "/:id",
            get(routes::businesses::get_business)
                .put(routes::businesses::update_business)
                .delete(routes::businesses::delete_business),
        )
        .route("/:id/status", patch(routes::businesses::change_status))
        .route(
            "/:id/package",
            put(routes::businesses::assign_package).delete(routes::businesses::remove_package),
        );

    let teacher_routes = Router::new()
        .route(
            "/",
            post(routes::teachers::create_teacher).get(routes::teachers::list_teachers),
        )
        .route(
            "/:id",
            get(routes::teachers::get_teacher)
                .put(routes::teachers::update_teacher)
                .delete(routes::teachers::delete_teacher),
        )
        .route("/:id/status", patch(routes::teachers::change_status));

    let student_routes = Router::new()
        .route(
            "/",
            post(routes::students::create_student).get(routes::students::list_students),
        )
        .route(
            "/:id",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        .route("/:id/status", patch(routes::students::change_status));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/packages", package_routes)
        .nest("/businesses", business_routes)
        .nest("/teachers", teacher_routes)
        .nest("/students", student_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Validates the bearer token with the configured secret
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(state.jwt_secret().to_string(), req, next).await
}
