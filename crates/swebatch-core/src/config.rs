//! Configuration management for swebatch
//!
//! Settings for the hosting API client and catalog defaults. Everything has a
//! default, so a missing config file is not an error.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, SwebatchError};

/// Repository-level swebatch configuration
///
/// Loaded from `.swebatch/config.toml` in the given root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwebatchConfig {
    /// Hosting API settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Catalog loading defaults
    #[serde(default)]
    pub catalog: CatalogDefaults,
}

/// Hosting API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable containing the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// User-Agent sent with every request (the API rejects requests without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional request timeout. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Defaults applied while turning raw records into task instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefaults {
    /// Working-directory name of the repository inside the task container
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Seed for `--shuffle`
    #[serde(default = "default_shuffle_seed")]
    pub shuffle_seed: u64,
}

// Default value providers
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    format!("swebatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_repo_name() -> String {
    "testbed".to_string()
}

fn default_shuffle_seed() -> u64 {
    42
}

impl SwebatchConfig {
    /// Load configuration from `.swebatch/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".swebatch/config.toml");

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SwebatchError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Write default configuration to `.swebatch/config.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".swebatch");
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| SwebatchError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_dir.join("config.toml"), content)?;
        Ok(())
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            repo_name: default_repo_name(),
            shuffle_seed: default_shuffle_seed(),
        }
    }
}
