//! DRAFTHORSE configuration loaded from `drafthorse.toml`.
//!
//! The [`DrafthorseConfig`] struct holds every configurable parameter.
//! Values missing from the file fall back to sensible defaults. The
//! `ZHIPU_API_KEY` environment variable takes precedence over the file.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `drafthorse.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DrafthorseConfig {
    /// Zhipu GLM API key.
    #[serde(default)]
    pub api_key: String,

    /// Model used for every specialist and the synthesis call.
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds for each generation request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional overall deadline for the fan-out batch, in seconds.
    /// Unset means each call is bounded only by its own timeout.
    #[serde(default)]
    pub job_deadline_secs: Option<u64>,

    /// Directory where synthesized reports are written.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
}

// Default model: "glm-4.5-air".
fn default_model() -> String {
    "glm-4.5-air".to_string()
}

// Default per-call timeout: 300 seconds.
fn default_request_timeout_secs() -> u64 {
    300
}

// Default reports directory: "reports".
fn default_reports_dir() -> String {
    "reports".to_string()
}

impl Default for DrafthorseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            job_deadline_secs: None,
            reports_dir: default_reports_dir(),
        }
    }
}

impl DrafthorseConfig {
    /// Load configuration from `drafthorse.toml` in the current directory.
    /// Uses defaults when the file is missing.
    pub fn load() -> Result<Self> {
        let path = Path::new("drafthorse.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<DrafthorseConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the config file for the API key.
        if let Ok(key) = std::env::var("ZHIPU_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}
