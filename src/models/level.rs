use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::GameError,
    game::{engine::DEFAULT_MIN_WORD_LENGTH, Board},
    models::Star,
    utils::LetterDictionary,
};

/// Type tag of a level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelType {
    Puzzle,
    Lightning,
    Theme,
    #[serde(untagged)]
    Unrecognized(String),
}

impl LevelType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "puzzle" => LevelType::Puzzle,
            "lightning" => LevelType::Lightning,
            "theme" => LevelType::Theme,
            _ => LevelType::Unrecognized(tag.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            LevelType::Puzzle => "puzzle",
            LevelType::Lightning => "lightning",
            LevelType::Theme => "theme",
            LevelType::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Type-specific end condition of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    /// Ends once this many words have been found
    Puzzle { max_words: u32 },
    /// Ends when the clock runs out
    Lightning { time_limit_secs: u32 },
    /// Ends once every listed word has been found
    Theme { words: Vec<String> },
    /// Loaded from a definition whose type tag is not known
    Unrecognized { tag: String },
}

impl LevelKind {
    pub fn level_type(&self) -> LevelType {
        match self {
            LevelKind::Puzzle { .. } => LevelType::Puzzle,
            LevelKind::Lightning { .. } => LevelType::Lightning,
            LevelKind::Theme { .. } => LevelType::Theme,
            LevelKind::Unrecognized { tag } => LevelType::Unrecognized(tag.clone()),
        }
    }

    fn has_meaningful_parameter(&self) -> bool {
        match self {
            LevelKind::Puzzle { max_words } => *max_words > 0,
            LevelKind::Lightning { time_limit_secs } => *time_limit_secs > 0,
            LevelKind::Theme { words } => {
                !words.is_empty() && self.theme_words_playable(DEFAULT_MIN_WORD_LENGTH)
            }
            LevelKind::Unrecognized { .. } => false,
        }
    }

    /// Whether every theme word can be spelled and accepted under
    /// `min_word_length`. Always true for other kinds.
    pub fn theme_words_playable(&self, min_word_length: usize) -> bool {
        match self {
            LevelKind::Theme { words } => words.iter().all(|w| {
                w.len() >= min_word_length.max(1) && w.chars().all(|c| c.is_ascii_alphabetic())
            }),
            _ => true,
        }
    }
}

/// An immutable level template.
///
/// Sessions never play a template directly; they play a [`Level::copy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub board: Board,
    pub stars: Vec<Star>,
    pub kind: LevelKind,
}

impl Level {
    pub fn new(name: impl Into<String>, board: Board, stars: Vec<Star>, kind: LevelKind) -> Self {
        Self {
            name: name.into(),
            board,
            stars,
            kind,
        }
    }

    pub fn level_type(&self) -> LevelType {
        self.kind.level_type()
    }

    /// Independent copy of the level; board and stars are not shared
    pub fn copy(&self) -> Level {
        self.clone()
    }

    pub fn is_valid(&self) -> bool {
        let stars_ordered = self
            .stars
            .windows(2)
            .all(|pair| pair[0].threshold <= pair[1].threshold);

        !self.name.trim().is_empty()
            && self.board.is_valid()
            && !self.stars.is_empty()
            && stars_ordered
            && self.kind.has_meaningful_parameter()
    }

    /// Build the serializable record for this level
    pub fn to_definition(&self) -> LevelDefinition {
        let mut definition = LevelDefinition {
            name: Some(self.name.clone()),
            layout: Some(self.board.layout()),
            stars: Some(self.stars.iter().map(|s| s.threshold).collect()),
            level_type: self.level_type().as_tag().to_string(),
            max_words: None,
            time_limit: None,
            theme_words: None,
        };

        match &self.kind {
            LevelKind::Puzzle { max_words } => definition.max_words = Some(*max_words),
            LevelKind::Lightning { time_limit_secs } => {
                definition.time_limit = Some(*time_limit_secs)
            }
            LevelKind::Theme { words } => definition.theme_words = Some(words.clone()),
            LevelKind::Unrecognized { .. } => {}
        }

        definition
    }
}

/// On-disk form of a level.
///
/// Every field is optional so that incomplete files still load; the
/// resulting [`Level`] then fails [`Level::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub layout: Option<Vec<String>>,
    #[serde(default)]
    pub stars: Option<Vec<u32>>,
    #[serde(rename = "type", default)]
    pub level_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_words: Option<Vec<String>>,
}

impl LevelDefinition {
    /// Turn the record into a level template.
    ///
    /// Missing values become empty ones; only a layout that cannot describe a
    /// grid is an error.
    pub fn into_level(self, letters: &LetterDictionary) -> Result<Level, GameError> {
        let board = match &self.layout {
            Some(rows) => Board::from_layout(rows, letters)?,
            None => Board::new(0),
        };

        let stars = self
            .stars
            .unwrap_or_default()
            .into_iter()
            .map(Star::new)
            .collect();

        let kind = match LevelType::from_tag(&self.level_type) {
            LevelType::Puzzle => LevelKind::Puzzle {
                max_words: self.max_words.unwrap_or(0),
            },
            LevelType::Lightning => LevelKind::Lightning {
                time_limit_secs: self.time_limit.unwrap_or(0),
            },
            LevelType::Theme => LevelKind::Theme {
                words: self
                    .theme_words
                    .unwrap_or_default()
                    .into_iter()
                    .map(|w| w.trim().to_uppercase())
                    .collect(),
            },
            LevelType::Unrecognized(tag) => LevelKind::Unrecognized { tag },
        };

        Ok(Level::new(self.name.unwrap_or_default(), board, stars, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn puzzle_level() -> Level {
        let letters = LetterDictionary::new();
        let board = Board::from_layout(
            &["CAT...", "......", "..##..", "......", "......", "......"],
            &letters,
        )
        .unwrap();
        Level::new(
            "Warm Up",
            board,
            vec![Star::new(10), Star::new(50), Star::new(100)],
            LevelKind::Puzzle { max_words: 3 },
        )
    }

    #[test]
    fn test_valid_levels() {
        assert!(puzzle_level().is_valid());

        let mut lightning = puzzle_level();
        lightning.kind = LevelKind::Lightning { time_limit_secs: 60 };
        assert!(lightning.is_valid());
        assert_eq!(lightning.level_type(), LevelType::Lightning);

        let mut theme = puzzle_level();
        theme.kind = LevelKind::Theme {
            words: vec!["CAT".to_string()],
        };
        assert!(theme.is_valid());
    }

    #[test]
    fn test_invalid_levels() {
        let mut unnamed = puzzle_level();
        unnamed.name = String::new();
        assert!(!unnamed.is_valid());

        let mut no_stars = puzzle_level();
        no_stars.stars.clear();
        assert!(!no_stars.is_valid());

        let mut unordered = puzzle_level();
        unordered.stars = vec![Star::new(50), Star::new(10)];
        assert!(!unordered.is_valid());

        let mut zero_words = puzzle_level();
        zero_words.kind = LevelKind::Puzzle { max_words: 0 };
        assert!(!zero_words.is_valid());

        let mut no_time = puzzle_level();
        no_time.kind = LevelKind::Lightning { time_limit_secs: 0 };
        assert!(!no_time.is_valid());

        let mut empty_theme = puzzle_level();
        empty_theme.kind = LevelKind::Theme { words: vec![] };
        assert!(!empty_theme.is_valid());

        let mut unknown = puzzle_level();
        unknown.kind = LevelKind::Unrecognized {
            tag: "Marathon".to_string(),
        };
        assert!(!unknown.is_valid());

        let mut no_board = puzzle_level();
        no_board.board = Board::new(0);
        assert!(!no_board.is_valid());
    }

    #[test]
    fn test_copy_is_independent() {
        let template = puzzle_level();
        let mut copy = template.copy();

        copy.board.set_tile(Position::new(0, 0), None).unwrap();
        copy.board.apply_gravity();
        copy.stars[0] = Star::new(1);

        assert_eq!(template.board.layout()[0], "CAT...");
        assert_eq!(template.stars[0], Star::new(10));
        assert_ne!(template.board, copy.board);
    }

    #[test]
    fn test_definition_roundtrip() {
        let template = puzzle_level();
        let json = serde_json::to_string(&template.to_definition()).unwrap();
        let parsed: LevelDefinition = serde_json::from_str(&json).unwrap();
        let loaded = parsed.into_level(&LetterDictionary::new()).unwrap();

        assert!(loaded.is_valid());
        assert_eq!(loaded, template);
    }

    #[test]
    fn test_definition_with_missing_fields_is_invalid() {
        let parsed: LevelDefinition =
            serde_json::from_str(r#"{"type": "puzzle", "max_words": 4}"#).unwrap();
        let level = parsed.into_level(&LetterDictionary::new()).unwrap();
        assert!(!level.is_valid());
    }

    #[test]
    fn test_definition_without_type_loads_as_invalid() {
        let parsed: LevelDefinition = serde_json::from_str(
            r#"{"name": "X", "layout": ["CAT", "...", "..."], "stars": [1], "max_words": 3}"#,
        )
        .unwrap();
        let level = parsed.into_level(&LetterDictionary::new()).unwrap();
        assert_eq!(level.level_type(), LevelType::Unrecognized(String::new()));
        assert!(!level.is_valid());
    }

    #[test]
    fn test_unplayable_theme_words_are_invalid() {
        let mut short = puzzle_level();
        short.kind = LevelKind::Theme {
            words: vec!["CAT".to_string(), "AT".to_string()],
        };
        assert!(!short.is_valid());

        let mut digits = puzzle_level();
        digits.kind = LevelKind::Theme {
            words: vec!["C4T".to_string()],
        };
        assert!(!digits.is_valid());

        let theme = LevelKind::Theme {
            words: vec!["CAT".to_string()],
        };
        assert!(theme.theme_words_playable(3));
        assert!(!theme.theme_words_playable(4));
        assert!(LevelKind::Puzzle { max_words: 1 }.theme_words_playable(10));
    }

    #[test]
    fn test_definition_with_unknown_type() {
        let parsed: LevelDefinition = serde_json::from_str(
            r#"{"name": "Odd", "layout": ["A"], "stars": [1], "type": "marathon"}"#,
        )
        .unwrap();
        let level = parsed.into_level(&LetterDictionary::new()).unwrap();
        assert_eq!(
            level.level_type(),
            LevelType::Unrecognized("marathon".to_string())
        );
        assert!(!level.is_valid());
    }

    #[test]
    fn test_theme_words_are_normalized() {
        let parsed: LevelDefinition = serde_json::from_str(
            r#"{"name": "Pets", "layout": ["CAT", "DOG", "..."], "stars": [1],
                "type": "Theme", "theme_words": [" cat", "Dog "]}"#,
        )
        .unwrap();
        let level = parsed.into_level(&LetterDictionary::new()).unwrap();
        assert_eq!(
            level.kind,
            LevelKind::Theme {
                words: vec!["CAT".to_string(), "DOG".to_string()]
            }
        );
    }
}
