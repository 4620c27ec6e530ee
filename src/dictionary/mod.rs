use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::fs;

/// Set of playable words. Entries and lookups are trimmed and uppercased.
pub struct WordDictionary {
    words: HashSet<String>,
}

impl WordDictionary {
    /// Load dictionary from a newline separated word list.
    ///
    /// An unreadable file or a list without any words is an error; the game
    /// must not run against a partial dictionary.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let dictionary = Self::from_words(content.lines());
        if dictionary.is_empty() {
            bail!("Word list {} contains no words", path.display());
        }

        tracing::info!("Loaded {} words into dictionary", dictionary.len());

        Ok(dictionary)
    }

    /// Build a dictionary from in-memory words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| Self::normalize(word.as_ref()))
            .filter(|word| !word.is_empty())
            .collect();

        Self { words }
    }

    /// Check if a word exists in the dictionary
    pub fn is_word(&self, word: &str) -> bool {
        self.words.contains(&Self::normalize(word))
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn normalize(word: &str) -> String {
        word.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let dict = WordDictionary::from_words(["cat", " Dog ", ""]);
        assert_eq!(dict.len(), 2);
        assert!(dict.is_word("CAT"));
        assert!(dict.is_word("cat"));
        assert!(dict.is_word("dog"));
        assert!(!dict.is_word("ZZQX"));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = tokio_test::block_on(WordDictionary::load("/nonexistent/words.txt"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_word_list_fails() {
        let path = std::env::temp_dir().join(format!("lettercraze-empty-{}.txt", uuid::Uuid::new_v4()));
        fs::write(&path, "\n  \n").await.unwrap();

        let result = WordDictionary::load(&path).await;
        let _ = fs::remove_file(&path).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_word_list() {
        let path = std::env::temp_dir().join(format!("lettercraze-words-{}.txt", uuid::Uuid::new_v4()));
        fs::write(&path, "cat\ntrain\nrain\n").await.unwrap();

        let dict = WordDictionary::load(&path).await.unwrap();
        let _ = fs::remove_file(&path).await;

        assert_eq!(dict.len(), 3);
        assert!(dict.is_word("Train"));
    }
}
