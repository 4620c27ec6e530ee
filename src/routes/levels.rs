use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{levels::LevelSummary, models::LevelDefinition, AppState};

/// List every level in catalogue order
pub async fn list_levels(State(state): State<Arc<AppState>>) -> Json<Vec<LevelSummary>> {
    Json(state.catalog.summaries())
}

/// Full definition of a single level
pub async fn get_level(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<LevelDefinition>, (StatusCode, Json<Value>)> {
    state
        .catalog
        .get(&name)
        .map(|level| Json(level.to_definition()))
        .map_err(|e| (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))))
}

/// Connections currently playing, with the level each one is on
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Value> {
    let sessions: Vec<Value> = state
        .active_sessions
        .iter()
        .map(|entry| {
            json!({
                "session_id": entry.session_id,
                "level": entry.level,
                "connected_at": entry.connected_at,
            })
        })
        .collect();

    Json(json!({ "sessions": sessions }))
}
