/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskmgr_api::{app::AppState, config::Config};
/// use taskmgr_shared::store::memory::{MemoryTaskStore, MemoryUserStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::from_stores(
///     Arc::new(MemoryUserStore::new()),
///     Arc::new(MemoryTaskStore::new()),
///     config,
/// )?;
/// let app = taskmgr_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskmgr_shared::{
    auth::{
        jwt::{JwtService, TokenService},
        middleware::{role_gate, RoleGate},
        password::{Argon2PasswordService, PasswordService},
    },
    models::user::Role,
    store::{TaskStore, UserStore},
    usecase::{TaskUsecase, UserUsecase},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and user lookup
    pub users: UserUsecase,

    /// Task CRUD with ownership checks
    pub tasks: TaskUsecase,

    /// Token verification for the access-control gate
    pub tokens: Arc<dyn TokenService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        users: UserUsecase,
        tasks: TaskUsecase,
        tokens: Arc<dyn TokenService>,
        config: Config,
    ) -> Self {
        Self {
            users,
            tasks,
            tokens,
            config: Arc::new(config),
        }
    }

    /// Wires usecases over the given stores using the hashing and token
    /// settings from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the Argon2 parameters are rejected.
    pub fn from_stores(
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let passwords: Arc<dyn PasswordService> =
            Arc::new(Argon2PasswordService::new(config.password.into())?);

        let tokens: Arc<dyn TokenService> = match config.jwt.ttl() {
            Some(ttl) => Arc::new(JwtService::with_ttl(&config.jwt.secret, ttl)),
            None => Arc::new(JwtService::new(&config.jwt.secret)),
        };

        let users = UserUsecase::new(user_store, passwords, tokens.clone());
        let tasks = TaskUsecase::new(task_store);

        Ok(Self::new(users, tasks, tokens, config))
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health              # Health check (public)
/// ├── POST /register            # Public
/// ├── POST /login               # Public
/// ├── /tasks                    # Role "user"
/// │   ├── POST   /
/// │   ├── GET    /
/// │   ├── GET    /:id
/// │   ├── PUT    /:id
/// │   └── DELETE /:id
/// └── /users                    # Role "admin"
///     ├── GET /
///     └── GET /:email
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Access-control gate (per route group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::get_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::remove_task),
        )
        .layer(middleware::from_fn_with_state(
            RoleGate::new(state.tokens.clone(), Role::User),
            role_gate,
        ));

    let user_routes = Router::new()
        .route("/", get(routes::users::get_users))
        .route("/:email", get(routes::users::get_user))
        .layer(middleware::from_fn_with_state(
            RoleGate::new(state.tokens.clone(), Role::Admin),
            role_gate,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(public_routes)
        .nest("/tasks", task_routes)
        .nest("/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
