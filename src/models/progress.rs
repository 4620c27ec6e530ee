use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    game::Scorer,
    models::{BoardSquare, Level, LevelKind, LevelType, Position},
};

/// Mutable state of one attempt at a level.
///
/// Owns its own copy of the level, so the board can be changed freely.
#[derive(Debug, Clone)]
pub struct LevelProgress {
    level: Level,
    score: u32,
    found_words: Vec<String>,
    star_count: usize,
    playing: bool,
    time_remaining: Option<Duration>,
    started_at: DateTime<Utc>,
}

impl LevelProgress {
    /// Wrap an already copied level. Lightning levels start with a full clock.
    pub fn new(level: Level) -> Self {
        let time_remaining = match &level.kind {
            LevelKind::Lightning { time_limit_secs } => {
                Some(Duration::from_secs(u64::from(*time_limit_secs)))
            }
            _ => None,
        };

        Self {
            level,
            score: 0,
            found_words: Vec::new(),
            star_count: 0,
            playing: true,
            time_remaining,
            started_at: Utc::now(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn found_words(&self) -> &[String] {
        &self.found_words
    }

    pub fn star_count(&self) -> usize {
        self.star_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn has_found(&self, word: &str) -> bool {
        self.found_words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn add_found_word(&mut self, word: String) {
        self.found_words.push(word);
    }

    /// Recount the stars reached by the current score
    pub(crate) fn update_stars(&mut self) -> usize {
        self.star_count = Scorer::star_count(&self.level.stars, self.score);
        self.star_count
    }

    pub(crate) fn stop(&mut self) {
        self.playing = false;
        self.level.board.set_selected_word(None);
    }

    pub(crate) fn set_time_remaining(&mut self, remaining: Duration) {
        self.time_remaining = Some(remaining);
    }

    /// Read-only view of the attempt for presentation
    pub fn snapshot(&self) -> ProgressSnapshot {
        let board = &self.level.board;
        let rows = board
            .squares()
            .chunks(board.size().max(1))
            .map(|row| row.iter().map(SquareView::from).collect())
            .collect();

        ProgressSnapshot {
            level_name: self.level.name.clone(),
            level_type: self.level.level_type(),
            score: self.score,
            found_words: self.found_words.clone(),
            star_count: self.star_count,
            total_stars: self.level.stars.len(),
            playing: self.playing,
            time_remaining_secs: self.time_remaining.map(|d| d.as_secs()),
            board: rows,
        }
    }
}

/// Presentation form of one square
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareView {
    pub position: Position,
    pub enabled: bool,
    pub selected: bool,
    pub letter: Option<char>,
    pub points: Option<u32>,
}

impl From<&BoardSquare> for SquareView {
    fn from(square: &BoardSquare) -> Self {
        Self {
            position: square.position(),
            enabled: square.is_enabled(),
            selected: square.is_selected(),
            letter: square.tile().map(|t| t.letter()),
            points: square.tile().map(|t| t.points()),
        }
    }
}

/// Everything the presentation needs to draw an attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub level_name: String,
    pub level_type: LevelType,
    pub score: u32,
    pub found_words: Vec<String>,
    pub star_count: usize,
    pub total_stars: usize,
    pub playing: bool,
    pub time_remaining_secs: Option<u64>,
    pub board: Vec<Vec<SquareView>>,
}

/// Best results recorded for a level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub best_score: u32,
    pub best_stars: usize,
    pub times_completed: u32,
    pub last_played: Option<DateTime<Utc>>,
}

/// Progress of one player across levels, plus the attempt in progress.
#[derive(Debug, Default)]
pub struct Model {
    records: HashMap<String, LevelRecord>,
    current_level_progress: Option<LevelProgress>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_level_progress(&self) -> Option<&LevelProgress> {
        self.current_level_progress.as_ref()
    }

    pub fn current_level_progress_mut(&mut self) -> Option<&mut LevelProgress> {
        self.current_level_progress.as_mut()
    }

    /// Replace the current attempt, recording the one it replaces
    pub fn begin(&mut self, progress: LevelProgress) {
        self.finish_current();
        self.current_level_progress = Some(progress);
    }

    /// Record the current attempt and drop it
    pub fn finish_current(&mut self) -> Option<LevelRecord> {
        let progress = self.current_level_progress.take()?;
        Some(self.record(&progress))
    }

    /// Fold an attempt into the level's best results
    pub fn record(&mut self, progress: &LevelProgress) -> LevelRecord {
        let record = self
            .records
            .entry(progress.level().name.clone())
            .or_default();

        record.best_score = record.best_score.max(progress.score());
        record.best_stars = record.best_stars.max(progress.star_count());
        if !progress.is_playing() {
            record.times_completed += 1;
        }
        record.last_played = Some(progress.started_at());

        record.clone()
    }

    pub fn record_for(&self, level_name: &str) -> Option<&LevelRecord> {
        self.records.get(level_name)
    }

    /// A level in an ordered list is playable once the level before it has
    /// earned at least one star. The first level is always playable.
    pub fn is_unlocked(&self, ordered_names: &[String], index: usize) -> bool {
        match index {
            0 => true,
            i => ordered_names
                .get(i - 1)
                .and_then(|prev| self.records.get(prev))
                .is_some_and(|record| record.best_stars > 0),
        }
    }
}
