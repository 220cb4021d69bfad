//! # swebatch-github
//!
//! Visibility resolution for hosted repositories.
//!
//! A benchmark catalog can name thousands of instances spread over a handful of
//! repositories. Each repository is classified as public or private once per run:
//!
//! - [`PrivacyCache`] remembers classifications, keyed by `owner/name` only
//! - [`VisibilityResolver`] consults the cache and falls back to the hosting API
//! - [`GithubApi`] is the HTTP seam; [`GithubClient`] talks to the real API and
//!   [`MockGithubApi`] replays scripted responses in tests
//!
//! Tokens are passed in explicitly. [`github_token`] is the only place that reads
//! the environment, and it is meant to be called once at the top of a run.

mod auth;
mod cache;
mod client;
mod visibility;

pub use auth::github_token;
pub use cache::PrivacyCache;
pub use client::{ApiResponse, GithubApi, GithubClient, MockGithubApi};
pub use visibility::VisibilityResolver;
