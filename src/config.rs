use crate::form::FormEntry;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable selecting the evaluation service base URL
pub const API_URL_ENV: &str = "INTERVIEW_EVAL_API_URL";

/// Local development endpoint used when no base URL is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Connection settings for the evaluation service
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Request timeout; the transport default applies when unset
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Self {
        let base_url = match base_url.strip_suffix('/') {
            Some(stripped) => stripped.to_string(),
            None => base_url,
        };
        Self { base_url, timeout }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string(), None)
    }
}

/// A batch of interview answers to evaluate, loaded from a TOML run file
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Overrides the base URL given on the command line or in the environment
    #[serde(default)]
    pub api_url: Option<String>,
    /// Optional local path to store the batch report as JSON
    #[serde(default)]
    pub storage_path: Option<String>,
    /// Answers to evaluate, in order
    #[serde(default)]
    pub submissions: Vec<FormEntry>,
}

impl BatchConfig {
    /// Load a batch from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML run file: {}", path.display()))
    }
}
