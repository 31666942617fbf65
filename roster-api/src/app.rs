/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use roster_api::{app::{build_router, AppState}, config::Config};
/// use roster_shared::store::{MemoryStore, Stores};
/// use roster_worker::queue::{side_effect_channel, WorkerConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let stores = Stores::new(MemoryStore::new());
/// let (queue, worker) = side_effect_channel(stores.tasks.clone(), WorkerConfig::default());
/// tokio::spawn(worker.run());
///
/// let app = build_router(AppState::new(stores, queue, config));
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use roster_shared::store::Stores;
use roster_worker::queue::SideEffectQueue;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Store backend, viewed through each store trait
    pub stores: Stores,

    /// Queue for background side-effects
    pub side_effects: SideEffectQueue,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(stores: Stores, side_effects: SideEffectQueue, config: Config) -> Self {
        Self {
            stores,
            side_effects,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                                  # Service info
/// ├── GET  /health                            # Store connectivity
/// ├── /users                                  # User management
/// │   ├── POST   /        GET /
/// │   └── GET    /:id     PUT /:id    DELETE /:id
/// ├── /analytics                              # Aggregations over users
/// │   ├── GET /department-stats
/// │   ├── GET /salary-ranges
/// │   ├── GET /role-summary
/// │   ├── GET /active-users-trend?days=N
/// │   └── GET /department-age-distribution
/// └── /tasks                                  # Task manager
///     ├── POST   /        GET /?done=&limit=
///     ├── GET    /:id     PUT /:id    PATCH /:id    DELETE /:id
///     └── POST   /:id/complete
/// ```
///
/// Collection routes also answer with a trailing slash (`/users/`, `/tasks/`).
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let cors = if state.config.cors_permissive() {
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
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/", get(routes::health::service_info))
        .route("/health", get(routes::health::health_check))
        // Users
        .route(
            "/users",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route(
            "/users/",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        // Analytics
        .route(
            "/analytics/department-stats",
            get(routes::analytics::department_stats),
        )
        .route(
            "/analytics/salary-ranges",
            get(routes::analytics::salary_ranges),
        )
        .route(
            "/analytics/role-summary",
            get(routes::analytics::role_summary),
        )
        .route(
            "/analytics/active-users-trend",
            get(routes::analytics::active_users_trend),
        )
        .route(
            "/analytics/department-age-distribution",
            get(routes::analytics::department_age_distribution),
        )
        // Tasks
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::replace_task)
                .patch(routes::tasks::patch_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/complete", post(routes::tasks::complete_task))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
