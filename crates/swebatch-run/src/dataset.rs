//! Raw dataset records
//!
//! Records are read loosely (every field optional, unknown fields ignored) and
//! validated afterwards so a missing field can be reported with its position.

use serde::{Deserialize, Serialize};
use std::path::Path;
use swebatch_core::{Result, SwebatchError};
use tracing::debug;

/// One untyped dataset record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstance {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub image_name: Option<String>,
    /// Target repository, `owner/name`
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default, rename = "FAIL_TO_PASS")]
    pub fail_to_pass: Option<Vec<String>>,
}

/// A record with every required field present
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InstanceRecord {
    pub instance_id: String,
    pub image_name: String,
    pub repo: String,
    pub problem_statement: String,
    pub fail_to_pass: Vec<String>,
}

impl RawInstance {
    /// Check required fields; `index` is the record's position in the dataset
    pub(crate) fn validate(self, index: usize) -> Result<InstanceRecord> {
        Ok(InstanceRecord {
            instance_id: require(self.instance_id, index, "instance_id")?,
            image_name: require(self.image_name, index, "image_name")?,
            repo: require(self.repo, index, "repo")?,
            problem_statement: require(self.problem_statement, index, "problem_statement")?,
            fail_to_pass: require(self.fail_to_pass, index, "FAIL_TO_PASS")?,
        })
    }
}

fn require<T>(value: Option<T>, index: usize, field: &'static str) -> Result<T> {
    value.ok_or(SwebatchError::MissingField { index, field })
}

/// Read every record from a dataset file
///
/// The format follows the extension: `.json` (array of records), `.jsonl` (one
/// record per line) or `.yaml`/`.yml` (sequence of records).
pub fn read_records(path: &Path) -> Result<Vec<RawInstance>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|e| {
        SwebatchError::Dataset(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let records: Vec<RawInstance> = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "jsonl" => parse_jsonl(&content, path)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        other => {
            return Err(SwebatchError::UnsupportedFormat(format!(
                "{} (extension '{}', expected json, jsonl, yaml or yml)",
                path.display(),
                other
            )))
        }
    };

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_jsonl(content: &str, path: &Path) -> Result<Vec<RawInstance>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                SwebatchError::Dataset(format!("{}:{}: {}", path.display(), i + 1, e))
            })
        })
        .collect()
}
