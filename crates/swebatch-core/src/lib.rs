//! # swebatch-core
//!
//! Shared types for the swebatch benchmark harness.
//!
//! swebatch turns a dataset of benchmark task descriptors into executable task
//! configurations for an autonomous coding agent. Each task names a source
//! repository and a base reference; swebatch decides how that repository can be
//! reached (public, or private behind a token) and which git commands restore
//! the exact starting state.
//!
//! This crate only holds what every other crate needs:
//!
//! - [`SwebatchError`] / [`Result`] - the unified error type
//! - [`SwebatchConfig`] - repository-level settings loaded from `.swebatch/config.toml`

mod config;
mod error;

pub use config::{CatalogDefaults, GithubConfig, SwebatchConfig};
pub use error::{Result, SwebatchError};
