mod config;
mod dictionary;
mod error;
mod game;
mod levels;
mod models;
mod routes;
mod utils;
mod websocket;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use config::Config;
use dashmap::DashMap;
use dictionary::WordDictionary;
use game::RemovalEngine;
use levels::LevelCatalog;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::LetterDictionary;
use uuid::Uuid;

/// A connected player, as shown by the sessions endpoint
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session_id: Uuid,
    /// Level currently being played, if any
    pub level: Option<String>,
    pub connected_at: DateTime<Utc>,
}

impl ActiveSession {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            level: None,
            connected_at: Utc::now(),
        }
    }
}

/// Application state shared across all handlers.
///
/// Everything here is read-only except the session registry; each
/// connection keeps its own play state.
pub struct AppState {
    pub config: Config,
    pub engine: RemovalEngine,
    pub catalog: LevelCatalog,
    pub active_sessions: DashMap<Uuid, ActiveSession>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lettercraze=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LetterCraze server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // The game cannot run without its word list
    let dictionary = WordDictionary::load(&config.game.dictionary_path)
        .await
        .context("Dictionary is required; set DICTIONARY_PATH to a word list")?;

    let letters = LetterDictionary::new();
    let catalog = LevelCatalog::load_dir(&config.game.levels_path, &letters)
        .await
        .context("Level definitions are required; set LEVELS_PATH to a level directory")?;

    let engine = RemovalEngine::new(Arc::new(dictionary), letters, config.engine_rules());
    tracing::info!(
        "Engine ready (min word length {}, duplicates {})",
        engine.rules().min_word_length,
        if engine.rules().allow_duplicate_words { "allowed" } else { "rejected" }
    );

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        engine,
        catalog,
        active_sessions: DashMap::new(),
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve the presentation client, if one is installed
    let frontend_service = ServeDir::new(&config.server.frontend_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
