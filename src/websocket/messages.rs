use serde::{Deserialize, Serialize};

use crate::{
    game::GameEvent,
    levels::LevelSummary,
    models::{LevelRecord, ProgressSnapshot},
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ListLevels,
    StartLevel {
        name: String,
    },
    PressSquare {
        row: usize,
        col: usize,
    },
    DragSquare {
        row: usize,
        col: usize,
    },
    Release,
    QuitLevel,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    LevelList {
        levels: Vec<LevelListing>,
    },
    LevelStarted {
        state: ProgressSnapshot,
    },
    Game {
        event: GameEvent,
    },
    LevelQuit {
        level: String,
        record: Option<LevelRecord>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelListing {
    #[serde(flatten)]
    pub summary: LevelSummary,
    pub unlocked: bool,
    pub record: Option<LevelRecord>,
}
