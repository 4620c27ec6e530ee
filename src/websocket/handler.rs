use crate::{
    websocket::{
        messages::{ClientMessage, ServerMessage},
        session::PlaySession,
    },
    ActiveSession, AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use uuid::Uuid;

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
///
/// Client messages and clock ticks are processed one at a time in this task,
/// which owns the player's session state.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    tracing::info!("WebSocket connection established: {}", session_id);
    state
        .active_sessions
        .insert(session_id, ActiveSession::new(session_id));

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    let mut session = PlaySession::new(state.config.game.rng_seed);
    let tick_every = Duration::from_millis(state.config.game.tick_interval_ms.max(1));
    let mut ticker = tokio::time::interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    'conn: loop {
        let replies = tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    handle_text(text.as_str(), &mut session, &state, session_id)
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Client disconnected: {}", session_id);
                    break;
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on {}: {}", session_id, e);
                    break;
                }
                Some(Ok(_)) => continue,
            },
            _ = ticker.tick() => session.tick(&state.engine, Instant::now()),
            _ = &mut send_task => break,
        };

        for reply in replies {
            if tx.send(reply).await.is_err() {
                break 'conn;
            }
        }
    }

    send_task.abort();
    session.close();
    state.active_sessions.remove(&session_id);

    tracing::info!("WebSocket connection closed: {}", session_id);
}

/// Parse and apply one text frame, turning failures into error replies
fn handle_text(
    text: &str,
    session: &mut PlaySession,
    state: &AppState,
    session_id: Uuid,
) -> Vec<ServerMessage> {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::error!("Failed to parse message: {}", e);
            return vec![ServerMessage::Error {
                message: format!("Invalid message format: {}", e),
            }];
        }
    };

    tracing::debug!("{}: {:?}", session_id, msg);

    let replies = match session.handle(msg, &state.engine, &state.catalog) {
        Ok(replies) => replies,
        Err(e) => {
            tracing::error!("Error handling message: {}", e);
            vec![ServerMessage::Error {
                message: e.to_string(),
            }]
        }
    };

    if let Some(mut active) = state.active_sessions.get_mut(&session_id) {
        active.level = session.current_level().map(str::to_string);
    }

    replies
}
