// File: src/config.rs
// Purpose: Configuration parsing from lendesk.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LendeskConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Remote REST API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Business parameters used when building form schemas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    #[serde(default = "default_carnet_min_length")]
    pub carnet_min_length: usize,

    /// How far ahead a disbursement date may be scheduled
    #[serde(default = "default_disbursement_window_months")]
    pub disbursement_window_months: u32,
}

// Default values
fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_env() -> String {
    "LENDESK_TOKEN".to_string()
}

fn default_password_min_length() -> usize {
    8
}

fn default_carnet_min_length() -> usize {
    6
}

fn default_disbursement_window_months() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min_length(),
            carnet_min_length: default_carnet_min_length(),
            disbursement_window_months: default_disbursement_window_months(),
        }
    }
}

impl LendeskConfig {
    /// Load configuration from lendesk.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: LendeskConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./lendesk.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("lendesk.toml")
    }
}
