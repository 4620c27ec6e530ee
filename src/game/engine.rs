use std::{sync::Arc, time::Duration};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    dictionary::WordDictionary,
    error::GameError,
    game::Word,
    models::{Level, LevelKind, LevelProgress, Position, ProgressSnapshot},
    utils::LetterDictionary,
};

/// Shortest word that can ever be accepted
pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

/// Tunable acceptance rules
#[derive(Debug, Clone)]
pub struct EngineRules {
    pub min_word_length: usize,
    /// Whether Puzzle and Lightning levels score a word again after it was
    /// found once. Theme levels never do.
    pub allow_duplicate_words: bool,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
            allow_duplicate_words: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A selected square has no tile
    IncompleteSelection,
    TooShort,
    NotInDictionary,
    NotInTheme,
    AlreadyFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    WordLimitReached,
    TimeExpired,
    ThemeComplete,
}

/// State changes produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SelectionChanged {
        positions: Vec<Position>,
    },
    HighlightCleared {
        positions: Vec<Position>,
    },
    WordAccepted {
        word: String,
        score: u32,
    },
    WordRejected {
        word: Option<String>,
        reason: RejectReason,
    },
    ClockTicked {
        remaining_secs: u64,
    },
    StateChanged {
        state: ProgressSnapshot,
    },
    LevelEnded {
        reason: EndReason,
        score: u32,
        star_count: usize,
    },
}

/// Turns selection gestures and clock ticks into changes of a
/// [`LevelProgress`].
///
/// The engine holds only read-only collaborators; every call gets the
/// attempt it works on passed in.
pub struct RemovalEngine {
    dictionary: Arc<WordDictionary>,
    letters: LetterDictionary,
    rules: EngineRules,
}

impl RemovalEngine {
    pub fn new(dictionary: Arc<WordDictionary>, letters: LetterDictionary, rules: EngineRules) -> Self {
        Self {
            dictionary,
            letters,
            rules,
        }
    }

    pub fn rules(&self) -> &EngineRules {
        &self.rules
    }

    pub fn letters(&self) -> &LetterDictionary {
        &self.letters
    }

    /// Begin an attempt on a copy of `template`, filling its blank squares.
    pub fn start_level(
        &self,
        template: &Level,
        rng: &mut impl Rng,
    ) -> Result<LevelProgress, GameError> {
        if !template.is_valid() {
            tracing::warn!("Refusing to start invalid level '{}'", template.name);
            return Err(GameError::InvalidLevel(template.name.clone()));
        }
        if !template.kind.theme_words_playable(self.rules.min_word_length) {
            tracing::warn!(
                "Refusing to start level '{}': theme words shorter than {} letters",
                template.name,
                self.rules.min_word_length
            );
            return Err(GameError::InvalidLevel(template.name.clone()));
        }

        let mut level = template.copy();
        let filled = level.board.fill_empty_squares(&self.letters, rng);
        tracing::debug!(
            "Started {} level '{}' with {} generated tiles",
            level.level_type(),
            level.name,
            filled.len()
        );

        Ok(LevelProgress::new(level))
    }

    /// Begin a new selection on the pressed square
    pub fn press_square(&self, progress: &mut LevelProgress, position: Position) -> Vec<GameEvent> {
        if !progress.is_playing() || !Self::is_selectable(progress, position) {
            return Vec::new();
        }

        let word = Word::starting_at(position);
        progress.level_mut().board.set_selected_word(Some(word));

        vec![GameEvent::SelectionChanged {
            positions: vec![position],
        }]
    }

    /// Extend the selection onto a dragged-over square
    pub fn drag_square(&self, progress: &mut LevelProgress, position: Position) -> Vec<GameEvent> {
        if !progress.is_playing() || !Self::is_selectable(progress, position) {
            return Vec::new();
        }

        let board = &mut progress.level_mut().board;
        let Some(mut word) = board.selected_word().cloned() else {
            return Vec::new();
        };
        if !word.try_push(position) {
            return Vec::new();
        }

        let positions = word.board_squares().to_vec();
        board.set_selected_word(Some(word));

        vec![GameEvent::SelectionChanged { positions }]
    }

    fn is_selectable(progress: &LevelProgress, position: Position) -> bool {
        progress
            .level()
            .board
            .square_at(position)
            .is_ok_and(|square| square.is_enabled() && !square.is_empty())
    }

    /// Handle the end of a selection gesture.
    ///
    /// Does nothing when the attempt is over or nothing is selected. A level
    /// of unknown type is reported as an error before anything is touched.
    pub fn submit_selection(
        &self,
        progress: &mut LevelProgress,
        rng: &mut impl Rng,
    ) -> Result<Vec<GameEvent>, GameError> {
        if !progress.is_playing() {
            return Ok(Vec::new());
        }
        let word = match progress.level().board.selected_word() {
            Some(word) if !word.is_empty() => word.clone(),
            _ => return Ok(Vec::new()),
        };

        if let LevelKind::Unrecognized { tag } = &progress.level().kind {
            tracing::error!(
                "Cannot remove word from level '{}': unknown level type '{}'",
                progress.level().name,
                tag
            );
            return Err(GameError::UnknownLevelType(tag.clone()));
        }

        let mut events = vec![GameEvent::HighlightCleared {
            positions: word.board_squares().to_vec(),
        }];

        let text = word.generate_string(&progress.level().board);
        let accepted = match self.judge(progress, &word, text.as_deref()) {
            Ok(accepted) => accepted,
            Err(reason) => {
                tracing::debug!("Rejected {:?}: {:?}", text, reason);
                progress.level_mut().board.set_selected_word(None);
                events.push(GameEvent::WordRejected { word: text, reason });
                events.push(GameEvent::StateChanged {
                    state: progress.snapshot(),
                });
                return Ok(events);
            }
        };

        let score = word.calculate_score(&progress.level().board);
        let refill = !matches!(progress.level().kind, LevelKind::Theme { .. });

        let board = &mut progress.level_mut().board;
        board.remove_tiles(&word)?;
        board.set_selected_word(None);
        board.apply_gravity();
        if refill {
            board.fill_empty_squares(&self.letters, rng);
        }

        progress.add_score(score);
        progress.add_found_word(accepted.clone());
        progress.update_stars();

        tracing::debug!(
            "Accepted '{}' for {} points (total {}, stars {})",
            accepted,
            score,
            progress.score(),
            progress.star_count()
        );

        events.push(GameEvent::WordAccepted {
            word: accepted,
            score,
        });

        let ended = self.check_end(progress);
        events.push(GameEvent::StateChanged {
            state: progress.snapshot(),
        });
        events.extend(ended);

        Ok(events)
    }

    /// Decide whether the selected word counts, returning it normalized
    fn judge(
        &self,
        progress: &LevelProgress,
        word: &Word,
        text: Option<&str>,
    ) -> Result<String, RejectReason> {
        let text = text.ok_or(RejectReason::IncompleteSelection)?.to_uppercase();
        if word.len() < self.rules.min_word_length {
            return Err(RejectReason::TooShort);
        }

        match &progress.level().kind {
            LevelKind::Theme { words } => {
                if !words.iter().any(|w| w.eq_ignore_ascii_case(&text)) {
                    return Err(RejectReason::NotInTheme);
                }
                if progress.has_found(&text) {
                    return Err(RejectReason::AlreadyFound);
                }
            }
            _ => {
                if !self.dictionary.is_word(&text) {
                    return Err(RejectReason::NotInDictionary);
                }
                if !self.rules.allow_duplicate_words && progress.has_found(&text) {
                    return Err(RejectReason::AlreadyFound);
                }
            }
        }

        Ok(text)
    }

    fn check_end(&self, progress: &mut LevelProgress) -> Option<GameEvent> {
        let reason = match &progress.level().kind {
            LevelKind::Puzzle { max_words } => {
                (progress.found_words().len() >= *max_words as usize)
                    .then_some(EndReason::WordLimitReached)
            }
            LevelKind::Theme { words } => words
                .iter()
                .all(|w| progress.has_found(w))
                .then_some(EndReason::ThemeComplete),
            LevelKind::Lightning { .. } | LevelKind::Unrecognized { .. } => None,
        }?;

        Some(Self::end(progress, reason))
    }

    fn end(progress: &mut LevelProgress, reason: EndReason) -> GameEvent {
        progress.stop();
        tracing::info!(
            "Level '{}' ended ({:?}) with score {} and {} stars",
            progress.level().name,
            reason,
            progress.score(),
            progress.star_count()
        );

        GameEvent::LevelEnded {
            reason,
            score: progress.score(),
            star_count: progress.star_count(),
        }
    }

    /// Advance the clock of a Lightning attempt by `elapsed`.
    ///
    /// Other level types and finished attempts ignore ticks.
    pub fn tick(&self, progress: &mut LevelProgress, elapsed: Duration) -> Vec<GameEvent> {
        if !progress.is_playing() {
            return Vec::new();
        }
        let Some(remaining) = progress.time_remaining() else {
            return Vec::new();
        };

        let remaining = remaining.saturating_sub(elapsed);
        progress.set_time_remaining(remaining);

        let mut events = vec![GameEvent::ClockTicked {
            remaining_secs: remaining.as_secs(),
        }];

        if remaining.is_zero() {
            events.push(Self::end(progress, EndReason::TimeExpired));
            events.push(GameEvent::StateChanged {
                state: progress.snapshot(),
            });
        }

        events
    }
}
