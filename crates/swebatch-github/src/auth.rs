//! Access token sourcing
//!
//! The token is read from a single environment variable (`GITHUB_TOKEN` unless
//! configured otherwise). It authenticates visibility lookups and is embedded in
//! mirror fetch URLs for private repositories.

use std::env;

/// Read the access token from `env_var`.
///
/// Unset and empty values both mean "no token". The value itself is never logged.
pub fn github_token(env_var: &str) -> Option<String> {
    match env::var(env_var) {
        Ok(token) if !token.is_empty() => {
            tracing::info!("Using access token from {}", env_var);
            Some(token)
        }
        _ => {
            tracing::debug!("{} is not set, hosting API requests will be anonymous", env_var);
            None
        }
    }
}
