use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::embedding_client::DEFAULT_MODEL;
use crate::policy::ScoringPolicy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON file overriding any subset of the default scoring policy.
    pub scoring_policy_path: Option<PathBuf>,
    /// OpenAI-compatible `/embeddings` endpoint. Unset disables semantic scoring.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_timeout_secs: u64,
    pub max_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_or("PORT", optional_env("PORT"), 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            scoring_policy_path: optional_env("SCORING_POLICY_PATH").map(PathBuf::from),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedding_timeout_secs: parse_or(
                "EMBEDDING_TIMEOUT_SECS",
                optional_env("EMBEDDING_TIMEOUT_SECS"),
                10,
            )?,
            max_batch_size: parse_or("MAX_BATCH_SIZE", optional_env("MAX_BATCH_SIZE"), 100)?,
        })
    }

    /// Loads the scoring policy (file override or defaults) and validates it.
    /// An invalid policy is a startup error.
    pub fn load_policy(&self) -> Result<ScoringPolicy> {
        let policy = match &self.scoring_policy_path {
            Some(path) => ScoringPolicy::from_file(path)
                .with_context(|| format!("Failed to load scoring policy from {}", path.display()))?,
            None => ScoringPolicy::default(),
        };
        policy.validate().context("Invalid scoring policy")?;
        Ok(policy)
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {value:?}")),
        None => Ok(default),
    }
}
