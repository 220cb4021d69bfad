//! Unified error types for swebatch

use thiserror::Error;

/// Unified error type for all swebatch operations
#[derive(Error, Debug)]
pub enum SwebatchError {
    // Dataset errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Dataset record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    // Credential errors
    #[error(
        "Repository {repo} for instance {instance_id} is private, but {env_var} is not set. \
         Export {env_var} with a token that can read {repo}."
    )]
    MissingCredential {
        instance_id: String,
        repo: String,
        env_var: String,
    },

    // Hosting API errors
    #[error("Hosting API returned HTTP {status} for {repo}: {body}")]
    HostingApi {
        repo: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    // Input errors
    #[error("Invalid slice specification: {0}")]
    InvalidSlice(String),

    #[error("Invalid instance filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid repository name: {0}")]
    InvalidRepoName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using SwebatchError
pub type Result<T> = std::result::Result<T, SwebatchError>;
