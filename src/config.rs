use crate::sources::api::DEFAULT_API_BASE;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Dashboard configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base: String,
    /// When set, deals and sales are read from this JSON snapshot instead of the API
    pub snapshot_path: Option<PathBuf>,
    pub page_size: usize,
    pub sales_limit: usize,
    pub top_n: usize,
    pub request_timeout: Duration,
    pub output_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            snapshot_path: None,
            page_size: 6,
            sales_limit: 50,
            top_n: 5,
            request_timeout: Duration::from_secs(30),
            output_path: PathBuf::from("dashboard.json"),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            api_base: lookup("DEAL_SCOUT_API_BASE").unwrap_or(defaults.api_base),
            snapshot_path: lookup("DEAL_SCOUT_SNAPSHOT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            page_size: parse_or(&lookup, "DEAL_SCOUT_PAGE_SIZE", defaults.page_size)?,
            sales_limit: parse_or(&lookup, "DEAL_SCOUT_SALES_LIMIT", defaults.sales_limit)?,
            top_n: parse_or(&lookup, "DEAL_SCOUT_TOP_N", defaults.top_n)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DEAL_SCOUT_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            output_path: lookup("DEAL_SCOUT_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        };

        if config.page_size == 0 {
            anyhow::bail!("DEAL_SCOUT_PAGE_SIZE must be at least 1");
        }

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}
