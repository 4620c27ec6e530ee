pub mod game;
pub mod level;
pub mod progress;

pub use game::{BoardSquare, Position, Star, Tile};
pub use level::{Level, LevelDefinition, LevelKind, LevelType};
pub use progress::{LevelProgress, LevelRecord, Model, ProgressSnapshot};
