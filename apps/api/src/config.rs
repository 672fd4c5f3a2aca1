use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// One week.
const DEFAULT_REPORT_RETENTION_HOURS: u64 = 168;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub report_dir: PathBuf,
    /// TTF/OTF font embedded in reports. When unset a CJK font is looked up in system font folders.
    pub report_font_path: Option<PathBuf>,
    /// Reports older than this are deleted. `None` keeps them forever.
    pub report_retention: Option<Duration>,
    /// Prefix for report links returned to clients, without trailing slash.
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let retention_hours = optional_env("REPORT_RETENTION_HOURS")
            .unwrap_or_else(|| DEFAULT_REPORT_RETENTION_HOURS.to_string())
            .parse::<u64>()
            .context("REPORT_RETENTION_HOURS must be a whole number of hours")?;

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            report_dir: optional_env("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./reports")),
            report_font_path: optional_env("REPORT_FONT_PATH").map(PathBuf::from),
            report_retention: retention(retention_hours),
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// 0 disables pruning.
fn retention(hours: u64) -> Option<Duration> {
    (hours > 0).then(|| Duration::from_secs(hours * 3600))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
