use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::game::{engine::DEFAULT_MIN_WORD_LENGTH, EngineRules};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub dictionary_path: String,
    pub levels_path: String,
    pub min_word_length: usize,
    pub allow_duplicate_words: bool,
    pub tick_interval_ms: u64,
    /// Seeds every session's tile generator when set
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "./frontend".to_string()),
        };

        let game = GameConfig {
            dictionary_path: env::var("DICTIONARY_PATH")
                .unwrap_or_else(|_| "./dictionary.txt".to_string()),
            levels_path: env::var("LEVELS_PATH")
                .unwrap_or_else(|_| "./levels".to_string()),
            min_word_length: env::var("MIN_WORD_LENGTH")
                .unwrap_or_else(|_| DEFAULT_MIN_WORD_LENGTH.to_string())
                .parse()
                .context("MIN_WORD_LENGTH must be a number")?,
            allow_duplicate_words: env::var("ALLOW_DUPLICATE_WORDS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("ALLOW_DUPLICATE_WORDS must be true or false")?,
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            rng_seed: env::var("RNG_SEED")
                .ok()
                .map(|seed| seed.parse::<u64>())
                .transpose()
                .context("RNG_SEED must be a number")?,
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn engine_rules(&self) -> EngineRules {
        EngineRules {
            min_word_length: self.game.min_word_length.max(1),
            allow_duplicate_words: self.game.allow_duplicate_words,
        }
    }
}
