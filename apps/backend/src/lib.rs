pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::store::SessionStore;
use crate::services::word_lists::WordListLibrary;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub word_lists: Arc<WordListLibrary>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(config.max_sessions)),
            word_lists: Arc::new(WordListLibrary::new(config.word_list_dir.clone())),
            config: Arc::new(config),
        }
    }
}

/// Build the full router over `state`.
pub fn build_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/", post(routes::sessions::create))
        .route(
            "/:id",
            get(routes::sessions::get).delete(routes::sessions::delete),
        )
        .route("/:id/items", put(routes::sessions::load_items))
        .route("/:id/answer", post(routes::sessions::answer))
        .route("/:id/skip", post(routes::sessions::skip))
        .route("/:id/advance", post(routes::sessions::advance))
        .route("/:id/stats", get(routes::sessions::stats))
        .route("/:id/history", get(routes::sessions::history))
        .route("/:id/speech/:field", get(routes::sessions::speech));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/word-lists", get(routes::word_lists::list))
        .nest("/api/sessions", session_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.addr();

    tracing::info!(
        word_lists = %config.word_list_dir.display(),
        max_sessions = config.max_sessions,
        "Loaded configuration"
    );

    let app = build_router(AppState::new(config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
