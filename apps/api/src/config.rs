use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::transcript::DEFAULT_MAX_CONTEXT_CHARS;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_JOB_RETENTION_SECS: usize = 60 * 60;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// JSON catalog replacing the built-in sections.
    pub section_catalog_path: Option<PathBuf>,
    pub max_transcript_chars: usize,
    pub max_upload_bytes: usize,
    /// How long a finished job and its document stay retrievable.
    pub job_retention: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            openai_api_key: var("OPENAI_API_KEY")
                .context("Required environment variable 'OPENAI_API_KEY' is not set")?,
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            section_catalog_path: var("SECTION_CATALOG_PATH").map(PathBuf::from),
            max_transcript_chars: positive_or(
                var("MAX_TRANSCRIPT_CHARS"),
                DEFAULT_MAX_CONTEXT_CHARS,
                "MAX_TRANSCRIPT_CHARS must be a positive integer",
            )?,
            max_upload_bytes: positive_or(
                var("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
                "MAX_UPLOAD_BYTES must be a positive integer",
            )?,
            job_retention: Duration::from_secs(positive_or(
                var("JOB_RETENTION_SECS"),
                DEFAULT_JOB_RETENTION_SECS,
                "JOB_RETENTION_SECS must be a positive integer",
            )? as u64),
            port: parse_or(var("PORT"), 8080, "PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T, message: &'static str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v.trim().parse::<T>().context(message),
        None => Ok(default),
    }
}

/// Like `parse_or`, but zero is rejected too.
fn positive_or(value: Option<String>, default: usize, message: &'static str) -> Result<usize> {
    match value {
        Some(v) => Ok(v.trim().parse::<NonZeroUsize>().context(message)?.get()),
        None => Ok(default),
    }
}
