//! Merging per-instance prediction files

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use swebatch_core::{Result, SwebatchError};
use tracing::{info, warn};

/// Merge every `*.pred` file directly inside `directory` into one JSON object
/// keyed by `instance_id`.
///
/// Writes to `output`, or `directory/preds.json` when unset, and returns the
/// number of prediction files found. With no prediction files nothing is written.
/// A later file with the same `instance_id` replaces an earlier one.
pub fn merge_predictions(directory: &Path, output: Option<&Path>) -> Result<usize> {
    let preds = find_predictions(directory)?;
    info!("Found {} predictions", preds.len());
    if preds.is_empty() {
        warn!("No predictions found in {}", directory.display());
        return Ok(0);
    }

    let mut merged = Map::new();
    for pred in &preds {
        let data: Value = serde_json::from_str(&std::fs::read_to_string(pred)?)?;
        let instance_id = data
            .get("instance_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SwebatchError::Dataset(format!(
                    "{} has no string 'instance_id' field",
                    pred.display()
                ))
            })?
            .to_string();
        merged.insert(instance_id, data);
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| directory.join("preds.json"));
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, serde_json::to_string(&Value::Object(merged))?)?;
    info!("Wrote merged predictions to {}", output.display());

    Ok(preds.len())
}

fn find_predictions(directory: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&directory.to_string_lossy());
    let pattern = format!("{}/*.pred", escaped);
    let mut preds = glob::glob(&pattern)
        .map_err(|e| SwebatchError::Other(format!("Invalid prediction pattern {}: {}", pattern, e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| SwebatchError::Io(e.into_error()))?;
    preds.sort();
    Ok(preds)
}
