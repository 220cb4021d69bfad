//! Hosting API client
//!
//! The resolver only needs the status code and body of one endpoint,
//! `GET /repos/{owner}/{name}`, so that is the whole seam. Status classification
//! happens in the resolver, not here.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swebatch_core::{GithubConfig, Result, SwebatchError};
use swebatch_repo::RepoSlug;
use tracing::{debug, instrument};

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Status and body of a hosting API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response carrying `{"private": <private>}`
    pub fn repo(private: bool) -> Self {
        Self::new(200, format!("{{\"private\": {}}}", private))
    }
}

/// Trait for fetching repository metadata (allows mocking in tests)
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Fetch the metadata document of `repo`, authenticated when `token` is set
    async fn get_repo(&self, repo: &RepoSlug, token: Option<&str>) -> Result<ApiResponse>;
}

/// Real hosting API client
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    user_agent: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SwebatchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    fn repo_url(&self, repo: &RepoSlug) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name)
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    #[instrument(skip_all, fields(repo = %repo, authenticated = token.is_some()))]
    async fn get_repo(&self, repo: &RepoSlug, token: Option<&str>) -> Result<ApiResponse> {
        let url = self.repo_url(repo);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", &self.user_agent);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SwebatchError::Http(format!("Request for {} failed: {}", repo, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SwebatchError::Http(format!("Failed to read response for {}: {}", repo, e)))?;

        debug!(status, "Hosting API responded");
        Ok(ApiResponse { status, body })
    }
}

/// Scripted hosting API for tests
///
/// Responses are queued per `owner/name`. The last queued response repeats once
/// the queue is down to one entry. Clones share the queue and counters.
#[derive(Clone, Default)]
pub struct MockGithubApi {
    responses: Arc<Mutex<HashMap<String, VecDeque<ApiResponse>>>>,
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockGithubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, repo: &str, response: ApiResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(repo.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Sleep before answering, to widen race windows in concurrency tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(owner/name, token)` of every request, in order
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl GithubApi for MockGithubApi {
    async fn get_repo(&self, repo: &RepoSlug, token: Option<&str>) -> Result<ApiResponse> {
        let key = repo.full_name();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((key.clone(), token.map(str::to_string)));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let queue = responses
            .get_mut(&key)
            .ok_or_else(|| SwebatchError::Http(format!("No mock response for: {}", key)))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| SwebatchError::Http(format!("No mock response for: {}", key)))
    }
}
