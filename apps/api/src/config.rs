use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Replacement lexicon file. The embedded lexicon is used when unset.
    pub lexicon_path: Option<PathBuf>,
    /// Default number of ranked terms kept per document.
    pub term_limit: usize,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            lexicon_path: std::env::var("LEXICON_PATH").ok().map(PathBuf::from),
            term_limit: parse_env("TERM_LIMIT", 20)?,
            max_body_bytes: parse_env("MAX_BODY_BYTES", 2 * 1024 * 1024)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            lexicon_path: None,
            term_limit: 20,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
