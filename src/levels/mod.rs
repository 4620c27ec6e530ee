use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{
    error::GameError,
    models::{Level, LevelDefinition, LevelType},
    utils::LetterDictionary,
};

/// Short description of a level for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSummary {
    pub name: String,
    pub level_type: LevelType,
    pub stars: Vec<u32>,
    pub valid: bool,
}

/// Ordered, read-only set of level templates.
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Load every `*.json` level definition in `dir`, in file name order.
    ///
    /// A file that cannot be parsed fails the whole load. Levels that parse
    /// but are not valid are kept and logged; they cannot be started.
    pub async fn load_dir<P: AsRef<Path>>(dir: P, letters: &LetterDictionary) -> Result<Self> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read level directory {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut levels = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read level {}", path.display()))?;
            let definition: LevelDefinition = serde_json::from_str(&content)
                .with_context(|| format!("Invalid level definition {}", path.display()))?;
            let level = definition
                .into_level(letters)
                .with_context(|| format!("Invalid level layout in {}", path.display()))?;

            if !level.is_valid() {
                tracing::warn!("Level {} ('{}') is not valid", path.display(), level.name);
            }
            levels.push(level);
        }

        if levels.is_empty() {
            bail!("No level definitions found in {}", dir.display());
        }

        tracing::info!("Loaded {} levels from {}", levels.len(), dir.display());

        Ok(Self { levels })
    }

    pub fn get(&self, name: &str) -> Result<&Level, GameError> {
        self.levels
            .iter()
            .find(|level| level.name == name)
            .ok_or_else(|| GameError::LevelNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.levels.iter().map(|level| level.name.clone()).collect()
    }

    pub fn summaries(&self) -> Vec<LevelSummary> {
        self.levels
            .iter()
            .map(|level| LevelSummary {
                name: level.name.clone(),
                level_type: level.level_type(),
                stars: level.stars.iter().map(|s| s.threshold).collect(),
                valid: level.is_valid(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
