mod config;
mod errors;
mod handlers;
mod models;
mod services;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::Config,
    services::{AuthService, RedisStore, TaskService, UserStore},
};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub store: Arc<dyn UserStore>,
}

#[tokio::main]
async fn main() {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().expect("Failed to load configuration");

    // One shared store client, constructed once and reused by every
    // request. An unreachable store aborts startup.
    let redis_client = Arc::new(
        redis::Client::open(config.redis.url.clone()).expect("Invalid redis URL"),
    );
    redis_client
        .get_async_connection()
        .await
        .expect("Failed to reach the document store");

    let store: Arc<dyn UserStore> = Arc::new(RedisStore::new(redis_client));
    let state = AppState {
        auth: AuthService::new(store.clone()),
        tasks: TaskService::new(store.clone()),
        store,
    };

    // Allow cross origin requests from the configured front-end origin
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors
                .allowed_origin
                .parse::<HeaderValue>()
                .expect("Invalid CORS origin"),
        )
        .allow_methods(Any)
        .allow_headers(Any);

    // Create router with all routes
    let app = Router::new()
        // Auth routes
        .route("/auth/create-account", post(handlers::create_account))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        // Session-gated task routes; id + token travel as query params
        .route("/tasks/get", get(handlers::list_tasks))
        .route("/tasks/get/:task_id", get(handlers::get_task))
        .route("/tasks/create", put(handlers::create_task))
        .route("/tasks/update", post(handlers::update_task))
        .route("/tasks/delete/:task_id", delete(handlers::delete_task))
        // Read-only listing routes
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/:name", get(handlers::get_user))
        .route("/api/tasks/:name", get(handlers::user_tasks))
        .route("/api/tasks/:name/:task_id", get(handlers::user_task))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state);

    tracing::info!(
        "server listening on {}:{}",
        config.server.host,
        config.server.port
    );
    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await
    .expect("Failed to bind server");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Failed to start server");
}
