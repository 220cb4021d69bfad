//! Repository privacy cache

use std::collections::HashMap;
use std::sync::RwLock;

/// Privacy classifications keyed by `owner/name`
///
/// Unbounded and never expired: a run works against a fixed dataset, so each
/// repository needs to be classified once. Keys never include a token, so an
/// entry is valid whichever credentials produced it. Share via `Arc` and
/// construct a fresh one per run (or per test).
#[derive(Debug, Default)]
pub struct PrivacyCache {
    entries: RwLock<HashMap<String, bool>>,
}

impl PrivacyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached classification, `true` meaning private
    pub fn get(&self, repo: &str) -> Option<bool> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(repo)
            .copied()
    }

    pub fn set(&self, repo: &str, private: bool) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(repo.to_string(), private);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
