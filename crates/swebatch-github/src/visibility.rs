//! Repository visibility resolution
//!
//! Classifies a repository as private or public, at most one hosting API
//! request per repository per cache lifetime.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use swebatch_core::{Result, SwebatchError};
use swebatch_repo::RepoSlug;
use tracing::{debug, info, warn};

use crate::cache::PrivacyCache;
use crate::client::GithubApi;

#[derive(Debug, Deserialize)]
struct RepoMetadata {
    private: bool,
}

/// Resolves repository visibility through a [`PrivacyCache`]
///
/// | API response | result            | cached |
/// |--------------|-------------------|--------|
/// | 200          | `private` field   | yes    |
/// | 404          | private           | yes    |
/// | other        | `HostingApi` error| no     |
///
/// A 404 means the repository is invisible to the caller's credentials, which
/// is treated the same as private. Other failures are indeterminate and must be
/// retried by a later call rather than remembered.
pub struct VisibilityResolver {
    api: Arc<dyn GithubApi>,
    cache: Arc<PrivacyCache>,
    // One lock per key so concurrent misses for the same repository wait for
    // the first lookup instead of issuing their own. Removed when idle.
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl VisibilityResolver {
    pub fn new(api: Arc<dyn GithubApi>, cache: Arc<PrivacyCache>) -> Self {
        Self {
            api,
            cache,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<PrivacyCache> {
        &self.cache
    }

    /// Whether `repo_full_name` (`owner/name`) requires authentication to read
    ///
    /// An empty token is the same as no token.
    pub async fn is_private(&self, repo_full_name: &str, token: Option<&str>) -> Result<bool> {
        let slug = RepoSlug::parse(repo_full_name)?;
        let key = slug.full_name();

        if let Some(private) = self.cache.get(&key) {
            debug!(repo = %key, private, "Privacy cache hit");
            return Ok(private);
        }

        let key_lock = self.key_lock(&key);
        let result = {
            let _guard = key_lock.lock().await;
            self.lookup(&slug, &key, token).await
        };
        self.release_key_lock(&key, &key_lock);
        result
    }

    async fn lookup(&self, slug: &RepoSlug, key: &str, token: Option<&str>) -> Result<bool> {
        // Another task may have resolved it while we waited
        if let Some(private) = self.cache.get(key) {
            debug!(repo = %key, private, "Privacy cache hit after wait");
            return Ok(private);
        }

        let token = token.filter(|t| !t.is_empty());
        let response = self.api.get_repo(slug, token).await?;

        let private = match response.status {
            200 => {
                let metadata: RepoMetadata =
                    serde_json::from_str(&response.body).map_err(|e| SwebatchError::HostingApi {
                        repo: key.to_string(),
                        status: response.status,
                        body: format!("unexpected repository metadata: {}", e),
                    })?;
                metadata.private
            }
            404 => {
                info!(repo = %key, "Repository not visible with current credentials, treating as private");
                true
            }
            status => {
                warn!(repo = %key, status, "Hosting API lookup failed");
                return Err(SwebatchError::HostingApi {
                    repo: key.to_string(),
                    status,
                    body: response.body,
                });
            }
        };

        debug!(repo = %key, private, "Resolved repository visibility");
        self.cache.set(key, private);
        Ok(private)
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .key_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Forget the lock for `key` once no other task is waiting on it
    fn release_key_lock(&self, key: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .key_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let idle = locks
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(entry, lock) && Arc::strong_count(lock) == 2);
        if idle {
            locks.remove(key);
        }
    }
}
