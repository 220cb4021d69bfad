//! # swebatch-repo
//!
//! Repository access layer for swebatch.
//!
//! This crate provides:
//! - Repository identifiers (`owner/name`) and their canonical clone URLs
//! - Token embedding for authenticated git transport
//! - Reset command synthesis (the fetch/checkout decision table)
//! - The closed set of repository configurations a task can use

mod config;
mod reset;
mod slug;
mod url;

pub use config::{GithubRepoConfig, PreExistingRepoConfig, RepoConfig, SweSmithRepoConfig};
pub use reset::reset_commands;
pub use slug::RepoSlug;
pub use url::{build_authenticated_url, redact_token};
