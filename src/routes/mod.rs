pub mod health;
pub mod levels;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/levels", get(levels::list_levels))
        .route("/levels/{name}", get(levels::get_level))
        .route("/sessions", get(levels::list_sessions))
}
