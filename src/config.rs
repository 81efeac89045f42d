//! Process configuration, built once at startup from the environment.
//!
//! All required values are checked before any pipeline step runs; a missing
//! one is a fatal startup condition, never a retryable error.

use std::time::Duration;

use anyhow::{Context, bail};
use embedding_adapter::{EmbedConfig, OutputShape};
use services::RetryPolicy;
use vector_index::IndexConfig;

/// Shared configuration for both subcommands.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub index: IndexConfig,
    pub embed: EmbedConfig,
    pub retry: RetryPolicy,
}

/// Per-issue inputs, required only by `analyze`.
#[derive(Clone, Debug)]
pub struct IssueContext {
    pub github_token: String,
    /// `owner/repo` identity of the repository under triage.
    pub repository: String,
    pub issue_number: u64,
    pub issue_body: String,
    /// API base override for GitHub Enterprise deployments.
    pub api_base: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut index = IndexConfig::new_default(
            must_env("QDRANT_URL")?,
            env_or("COLLECTION_NAME", "project-code"),
        );
        index.qdrant_api_key = opt_env("QDRANT_API_KEY");
        index.max_chunk_chars = env_parsed("MAX_CHUNK_LENGTH", 1000usize)?;

        let embed = EmbedConfig {
            endpoint: must_env("EMBEDDING_URL")?,
            model: must_env("EMBEDDING_MODEL")?,
            shape: parse_shape(&env_or("EMBEDDING_SHAPE", "pooled"))?,
            max_dim: env_parsed("MAX_EMBED_DIM", 3072usize)?,
        };

        let retry = RetryPolicy::new(
            env_parsed("RETRY_MAX_ATTEMPTS", 3u32)?,
            Duration::from_millis(env_parsed("RETRY_BASE_DELAY_MS", 2000u64)?),
        );

        Ok(Self {
            index,
            embed,
            retry,
        })
    }
}

impl IssueContext {
    pub fn from_env() -> anyhow::Result<Self> {
        let issue_number = must_env("ISSUE_NUMBER")?
            .parse::<u64>()
            .context("ISSUE_NUMBER must be a non-negative integer")?;
        Ok(Self {
            github_token: must_env("GITHUB_TOKEN")?,
            repository: must_env("GITHUB_REPOSITORY")?,
            issue_number,
            issue_body: must_env("ISSUE_BODY")?,
            api_base: opt_env("GITHUB_API_URL"),
        })
    }
}

/// Fetches a required, non-empty environment variable.
fn must_env(name: &'static str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("missing required environment variable: {name}"),
    }
}

fn opt_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    opt_env(name).unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &'static str, default: T) -> anyhow::Result<T> {
    match opt_env(name) {
        Some(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("invalid number in {name}")),
        None => Ok(default),
    }
}

fn parse_shape(raw: &str) -> anyhow::Result<OutputShape> {
    match raw.to_ascii_lowercase().as_str() {
        "pooled" => Ok(OutputShape::Pooled),
        "token-matrix" | "tokens" => Ok(OutputShape::TokenMatrix),
        "flat" => Ok(OutputShape::Flat),
        other => bail!("unsupported EMBEDDING_SHAPE '{other}' (pooled|token-matrix|flat)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_names_parse() {
        assert_eq!(parse_shape("pooled").unwrap(), OutputShape::Pooled);
        assert_eq!(parse_shape("Token-Matrix").unwrap(), OutputShape::TokenMatrix);
        assert_eq!(parse_shape("flat").unwrap(), OutputShape::Flat);
        assert!(parse_shape("nested").is_err());
    }
}
