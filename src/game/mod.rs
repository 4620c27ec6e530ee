// Board mechanics and the word removal engine

pub mod board;
pub mod engine;
pub mod scorer;
pub mod word;

pub use board::Board;
pub use engine::{EngineRules, GameEvent, RemovalEngine};
pub use scorer::Scorer;
pub use word::Word;
