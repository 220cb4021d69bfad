//! # swebatch-run
//!
//! Turns a benchmark dataset into executable task instances.
//!
//! Loading a catalog is a short pipeline:
//!
//! 1. Parse raw records (JSON array, JSONL or YAML)
//! 2. Optionally shuffle, then filter by instance id and slice
//! 3. Resolve each target repository's visibility
//! 4. Pick a mirror and credential strategy and build the [`TaskInstance`]
//!
//! Loading stops at the first record that cannot be resolved. A private
//! repository without a token is an error, never a silent fallback.

mod catalog;
mod dataset;
mod merge;
mod slice;
mod types;

pub use catalog::CatalogLoader;
pub use dataset::{read_records, RawInstance};
pub use merge::merge_predictions;
pub use slice::SliceSpec;
pub use types::{DeploymentConfig, InstanceSource, TaskInstance};
