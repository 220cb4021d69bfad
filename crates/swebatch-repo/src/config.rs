//! Repository configurations a task instance can use
//!
//! Every variant answers the same question - which commands reset the working
//! copy - and every variant answers it through [`reset_commands`], so the
//! fetch/checkout decision table lives in exactly one place.

use serde::{Deserialize, Serialize};
use swebatch_core::{Result, SwebatchError};

use crate::reset::reset_commands;
use crate::slug::RepoSlug;

fn default_repo_name() -> String {
    "testbed".to_string()
}

fn default_true() -> bool {
    true
}

/// Repository already present in the deployment image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreExistingRepoConfig {
    /// Directory name of the checkout inside the workspace
    pub repo_name: String,
    pub base_commit: String,
    /// When false the checkout is used as-is
    #[serde(default = "default_true")]
    pub reset: bool,
}

/// Repository cloned by the deployment backend from an explicit URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepoConfig {
    pub github_url: String,
    pub base_commit: String,
}

impl GithubRepoConfig {
    /// `owner__name`, used as the checkout directory
    pub fn repo_name(&self) -> Result<String> {
        let slug = RepoSlug::parse(&self.github_url)?;
        Ok(format!("{}__{}", slug.owner, slug.name))
    }
}

/// Benchmark repository baked into an image, optionally refreshed from a mirror
///
/// An empty `mirror_url` means the default remote is used and `base_commit`
/// is checked out by name. Otherwise the mirror's default ref is fetched and
/// checked out, and `base_commit` only identifies the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweSmithRepoConfig {
    #[serde(default = "default_repo_name")]
    pub repo_name: String,
    pub base_commit: String,
    #[serde(default)]
    pub mirror_url: String,
}

/// Repository access configuration for one task instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepoConfig {
    PreExisting(PreExistingRepoConfig),
    Github(GithubRepoConfig),
    SweSmith(SweSmithRepoConfig),
}

impl RepoConfig {
    /// Directory name of the checkout inside the workspace
    pub fn repo_name(&self) -> Result<String> {
        match self {
            Self::PreExisting(c) => Ok(c.repo_name.clone()),
            Self::Github(c) => c.repo_name(),
            Self::SweSmith(c) => Ok(c.repo_name.clone()),
        }
    }

    pub fn base_commit(&self) -> &str {
        match self {
            Self::PreExisting(c) => &c.base_commit,
            Self::Github(c) => &c.base_commit,
            Self::SweSmith(c) => &c.base_commit,
        }
    }

    /// Mirror to fetch from, if the variant has one configured
    pub fn mirror_url(&self) -> Option<&str> {
        match self {
            Self::SweSmith(c) if !c.mirror_url.is_empty() => Some(&c.mirror_url),
            _ => None,
        }
    }

    /// Commands that reset the working copy to `base_commit`
    ///
    /// `token` is only embedded when the variant fetches from a mirror.
    pub fn reset_commands(&self, token: Option<&str>) -> Vec<String> {
        if let Self::PreExisting(c) = self {
            if !c.reset {
                tracing::debug!(repo = %c.repo_name, "Reset disabled, keeping checkout as-is");
                return Vec::new();
            }
        }
        reset_commands(self.base_commit(), self.mirror_url(), token)
    }
}

impl From<SweSmithRepoConfig> for RepoConfig {
    fn from(config: SweSmithRepoConfig) -> Self {
        Self::SweSmith(config)
    }
}

impl From<GithubRepoConfig> for RepoConfig {
    fn from(config: GithubRepoConfig) -> Self {
        Self::Github(config)
    }
}

impl From<PreExistingRepoConfig> for RepoConfig {
    fn from(config: PreExistingRepoConfig) -> Self {
        Self::PreExisting(config)
    }
}

impl TryFrom<&str> for GithubRepoConfig {
    type Error = SwebatchError;

    /// Parse `<url>@<base_commit>`
    fn try_from(value: &str) -> Result<Self> {
        let (url, base) = value.rsplit_once('@').ok_or_else(|| {
            SwebatchError::InvalidRepoName(format!("'{}' is not in <url>@<commit> form", value))
        })?;
        RepoSlug::parse(url)?;
        Ok(Self {
            github_url: url.to_string(),
            base_commit: base.to_string(),
        })
    }
}
