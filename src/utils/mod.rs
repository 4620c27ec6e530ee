pub mod letters;

pub use letters::LetterDictionary;
