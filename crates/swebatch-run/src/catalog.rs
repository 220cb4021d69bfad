//! Instance catalog loading

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use std::sync::Arc;
use swebatch_core::{Result, SwebatchConfig, SwebatchError};
use swebatch_github::VisibilityResolver;
use swebatch_repo::{RepoSlug, SweSmithRepoConfig};
use tracing::{debug, info, instrument};

use crate::dataset::{read_records, InstanceRecord};
use crate::slice::SliceSpec;
use crate::types::{DeploymentConfig, InstanceSource, TaskInstance};

/// Builds [`TaskInstance`]s from a dataset file
///
/// The token is handed in by the caller rather than read here, so the loader
/// never touches the process environment. `token_env` is only used to name the
/// missing variable in errors.
pub struct CatalogLoader {
    resolver: Arc<VisibilityResolver>,
    token: Option<String>,
    token_env: String,
    repo_name: String,
    shuffle_seed: u64,
}

impl CatalogLoader {
    pub fn new(resolver: Arc<VisibilityResolver>, token: Option<String>) -> Self {
        Self::from_config(&SwebatchConfig::default(), resolver, token)
    }

    pub fn from_config(
        config: &SwebatchConfig,
        resolver: Arc<VisibilityResolver>,
        token: Option<String>,
    ) -> Self {
        Self {
            resolver,
            token: token.filter(|t| !t.is_empty()),
            token_env: config.github.token_env.clone(),
            repo_name: config.catalog.repo_name.clone(),
            shuffle_seed: config.catalog.shuffle_seed,
        }
    }

    /// Load, select and resolve every instance named by `source`
    ///
    /// Output order is input order (after the optional shuffle). Stops at the
    /// first record that fails validation or resolution.
    #[instrument(skip_all, fields(path = %source.path.display()))]
    pub async fn load(&self, source: &InstanceSource) -> Result<Vec<TaskInstance>> {
        let filter = source
            .filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|e| SwebatchError::InvalidFilter(format!("'{}': {}", pattern, e)))
            })
            .transpose()?;
        let slice = source.slice.as_deref().map(SliceSpec::parse).transpose()?;

        let mut records = read_records(&source.path)?
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.validate(index))
            .collect::<Result<Vec<_>>>()?;
        let total = records.len();

        if source.shuffle {
            records.sort_by(|a, b| a.instance_id.cmp(&b.instance_id));
            records.shuffle(&mut StdRng::seed_from_u64(self.shuffle_seed));
        }

        if let Some(filter) = &filter {
            records.retain(|record| filter.is_match(&record.instance_id));
            debug!("Filter '{}' kept {} of {} records", filter, records.len(), total);
        }

        if let Some(slice) = &slice {
            records = slice.apply(records);
            debug!("Slice '{}' kept {} records", slice, records.len());
        }

        let mut instances = Vec::with_capacity(records.len());
        for record in records {
            instances.push(self.build_instance(record).await?);
        }

        info!(
            "Loaded {} of {} instances ({} repositories classified)",
            instances.len(),
            total,
            self.resolver.cache().len()
        );
        Ok(instances)
    }

    async fn build_instance(&self, record: InstanceRecord) -> Result<TaskInstance> {
        let slug = RepoSlug::parse(&record.repo)?;
        let private = self
            .resolver
            .is_private(&slug.full_name(), self.token.as_deref())
            .await?;

        let mirror_url = if !private {
            String::new()
        } else if self.token.is_none() {
            return Err(SwebatchError::MissingCredential {
                instance_id: record.instance_id,
                repo: slug.full_name(),
                env_var: self.token_env.clone(),
            });
        } else {
            // Private repositories are fetched from their canonical clone URL
            slug.clone_url()
        };

        debug!(
            instance = %record.instance_id,
            repo = %slug,
            private,
            "Resolved repository access"
        );

        Ok(TaskInstance {
            repo: SweSmithRepoConfig {
                repo_name: self.repo_name.clone(),
                base_commit: record.instance_id.clone(),
                mirror_url,
            }
            .into(),
            deployment: DeploymentConfig::new(record.image_name),
            instance_id: record.instance_id,
            problem_statement: record.problem_statement,
            fail_to_pass: record.fail_to_pass,
        })
    }
}
