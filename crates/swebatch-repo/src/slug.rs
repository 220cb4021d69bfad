//! Repository identifiers in `owner/name` form

use serde::{Deserialize, Serialize};
use swebatch_core::{Result, SwebatchError};

const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";

/// A hosted repository identifier (`owner/name`)
///
/// This is the key space of the privacy cache, so it never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` identifier.
    ///
    /// Also accepts `https://github.com/owner/name` and a trailing `.git`, since
    /// datasets are not consistent about which form they store.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let stripped = trimmed
            .strip_prefix(GITHUB_HTTPS_PREFIX)
            .unwrap_or(trimmed)
            .trim_end_matches('/');
        let stripped = stripped.strip_suffix(".git").unwrap_or(stripped);

        let (owner, name) = stripped.split_once('/').ok_or_else(|| {
            SwebatchError::InvalidRepoName(format!("'{}' is not in owner/name form", input))
        })?;

        validate_component(owner, input)?;
        validate_component(name, input)?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Canonical HTTPS clone URL
    pub fn clone_url(&self) -> String {
        format!("{}{}/{}.git", GITHUB_HTTPS_PREFIX, self.owner, self.name)
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = SwebatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Components are interpolated into API paths and clone URLs.
fn validate_component(component: &str, input: &str) -> Result<()> {
    if component.is_empty() {
        return Err(SwebatchError::InvalidRepoName(format!(
            "'{}' has an empty owner or name",
            input
        )));
    }
    if component == "." || component == ".." {
        return Err(SwebatchError::InvalidRepoName(format!(
            "'{}' contains a relative path component",
            input
        )));
    }
    if component
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        Ok(())
    } else {
        Err(SwebatchError::InvalidRepoName(format!(
            "'{}' contains unsafe characters. Only alphanumeric, '_', '-', '.' are allowed.",
            input
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let slug = RepoSlug::parse("org/repo").unwrap();
        assert_eq!(slug.owner, "org");
        assert_eq!(slug.name, "repo");
        assert_eq!(slug.full_name(), "org/repo");
        assert_eq!(slug.clone_url(), "https://github.com/org/repo.git");
    }

    #[test]
    fn test_parse_url_forms() {
        for input in [
            "https://github.com/org/repo",
            "https://github.com/org/repo.git",
            "https://github.com/org/repo/",
            "  org/repo.git ",
        ] {
            assert_eq!(RepoSlug::parse(input).unwrap().full_name(), "org/repo", "{input}");
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", "repo", "/repo", "org/", "org/re po", "org/a/b", "../x"] {
            assert!(
                matches!(RepoSlug::parse(input), Err(SwebatchError::InvalidRepoName(_))),
                "expected rejection for {input:?}"
            );
        }
    }

    #[test]
    fn test_display_matches_full_name() {
        let slug: RepoSlug = "swesmith/org__repo.abc123".parse().unwrap();
        assert_eq!(slug.to_string(), "swesmith/org__repo.abc123");
    }
}
