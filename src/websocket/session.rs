use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    error::GameError,
    game::{GameEvent, RemovalEngine},
    levels::LevelCatalog,
    models::{LevelProgress, Model, Position, ProgressSnapshot},
    websocket::messages::{ClientMessage, LevelListing, ServerMessage},
};

/// Play state owned by one connection.
///
/// Every gesture and clock tick goes through `&mut self`, so a word removal
/// and a level-ending tick can never overlap.
pub struct PlaySession {
    model: Model,
    rng: StdRng,
    /// Last instant the Lightning clock was advanced to
    clock: Instant,
}

impl PlaySession {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            model: Model::new(),
            rng,
            clock: Instant::now(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn current_level(&self) -> Option<&str> {
        self.model
            .current_level_progress()
            .map(|progress| progress.level().name.as_str())
    }

    /// Apply one client message and collect the replies
    pub fn handle(
        &mut self,
        msg: ClientMessage,
        engine: &RemovalEngine,
        catalog: &LevelCatalog,
    ) -> Result<Vec<ServerMessage>, GameError> {
        match msg {
            ClientMessage::ListLevels => Ok(vec![self.list_levels(catalog)]),
            ClientMessage::StartLevel { name } => {
                let state = self.start_level(&name, engine, catalog)?;
                Ok(vec![ServerMessage::LevelStarted { state }])
            }
            ClientMessage::PressSquare { row, col } => {
                let progress = self.progress_mut()?;
                Ok(wrap(engine.press_square(progress, Position::new(row, col))))
            }
            ClientMessage::DragSquare { row, col } => {
                let progress = self.progress_mut()?;
                Ok(wrap(engine.drag_square(progress, Position::new(row, col))))
            }
            ClientMessage::Release => {
                let progress = self
                    .model
                    .current_level_progress_mut()
                    .ok_or(GameError::NoActiveLevel)?;
                let highlighted = progress
                    .level()
                    .board
                    .selected_word()
                    .map(|word| word.board_squares().to_vec());

                match engine.submit_selection(progress, &mut self.rng) {
                    Ok(events) => Ok(wrap(events)),
                    Err(e) => {
                        // The release still ends the gesture on screen
                        tracing::error!("Release failed: {}", e);
                        let mut replies = wrap(
                            highlighted
                                .map(|positions| vec![GameEvent::HighlightCleared { positions }])
                                .unwrap_or_default(),
                        );
                        replies.push(ServerMessage::Error {
                            message: e.to_string(),
                        });
                        Ok(replies)
                    }
                }
            }
            ClientMessage::QuitLevel => {
                let level = self
                    .current_level()
                    .ok_or(GameError::NoActiveLevel)?
                    .to_string();
                let record = self.model.finish_current();
                tracing::debug!("Quit level '{}'", level);
                Ok(vec![ServerMessage::LevelQuit { level, record }])
            }
        }
    }

    /// Advance the Lightning clock to `now`, if a Lightning level is running.
    ///
    /// Only time since the level started or since the previous tick counts.
    pub fn tick(&mut self, engine: &RemovalEngine, now: Instant) -> Vec<ServerMessage> {
        let elapsed = now.saturating_duration_since(self.clock);
        self.clock = self.clock.max(now);

        match self.model.current_level_progress_mut() {
            Some(progress) => wrap(engine.tick(progress, elapsed)),
            None => Vec::new(),
        }
    }

    /// Record whatever attempt is still open
    pub fn close(&mut self) {
        if let Some(record) = self.model.finish_current() {
            tracing::debug!("Closed session with record {:?}", record);
        }
    }

    fn progress_mut(&mut self) -> Result<&mut LevelProgress, GameError> {
        self.model
            .current_level_progress_mut()
            .ok_or(GameError::NoActiveLevel)
    }

    fn start_level(
        &mut self,
        name: &str,
        engine: &RemovalEngine,
        catalog: &LevelCatalog,
    ) -> Result<ProgressSnapshot, GameError> {
        let names = catalog.names();
        let index = names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| GameError::LevelNotFound(name.to_string()))?;

        // A finished attempt counts toward unlocking before the check
        self.finish_if_ended();
        if !self.model.is_unlocked(&names, index) {
            return Err(GameError::LevelLocked(name.to_string()));
        }

        let template = catalog.get(name)?;
        let progress = engine.start_level(template, &mut self.rng)?;
        let state = progress.snapshot();
        self.model.begin(progress);
        self.clock = Instant::now();

        tracing::info!("Started level '{}'", name);
        Ok(state)
    }

    fn list_levels(&mut self, catalog: &LevelCatalog) -> ServerMessage {
        self.finish_if_ended();
        let names = catalog.names();
        let levels = catalog
            .summaries()
            .into_iter()
            .enumerate()
            .map(|(index, summary)| LevelListing {
                unlocked: self.model.is_unlocked(&names, index),
                record: self.model.record_for(&summary.name).cloned(),
                summary,
            })
            .collect();

        ServerMessage::LevelList { levels }
    }

    fn finish_if_ended(&mut self) {
        let ended = self
            .model
            .current_level_progress()
            .is_some_and(|progress| !progress.is_playing());
        if ended {
            self.model.finish_current();
        }
    }
}

fn wrap(events: Vec<GameEvent>) -> Vec<ServerMessage> {
    events
        .into_iter()
        .map(|event| ServerMessage::Game { event })
        .collect()
}
