//! Task instance types handed to the run layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use swebatch_repo::RepoConfig;

/// Container deployment for one task instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Image the execution backend starts
    pub image: String,
}

impl DeploymentConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }
}

/// One benchmark unit
///
/// Built once by the catalog loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Unique within a catalog; encodes organization, repository and discriminator
    pub instance_id: String,
    pub problem_statement: String,
    pub repo: RepoConfig,
    pub deployment: DeploymentConfig,
    /// Tests expected to go from failing to passing
    #[serde(rename = "FAIL_TO_PASS")]
    pub fail_to_pass: Vec<String>,
}

impl TaskInstance {
    /// Reset commands for this instance's repository
    pub fn reset_commands(&self, token: Option<&str>) -> Vec<String> {
        self.repo.reset_commands(token)
    }
}

/// Where and how to load a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSource {
    pub path: PathBuf,

    /// Regular expression searched (not full-matched) against instance ids
    #[serde(default)]
    pub filter: Option<String>,

    /// `start:stop[:step]`, applied after filtering
    #[serde(default)]
    pub slice: Option<String>,

    /// Shuffle deterministically before filtering
    #[serde(default)]
    pub shuffle: bool,
}

impl InstanceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_slice(mut self, slice: impl Into<String>) -> Self {
        self.slice = Some(slice.into());
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}
