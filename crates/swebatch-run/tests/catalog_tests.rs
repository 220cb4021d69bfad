//! Integration tests for catalog loading
//!
//! Covers the full path from dataset file to task instance:
//! - Filtering and slicing
//! - Public and private repository handling
//! - Credential errors
//! - Reset commands of loaded instances

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use swebatch_core::{SwebatchConfig, SwebatchError};
use swebatch_github::{ApiResponse, MockGithubApi, PrivacyCache, VisibilityResolver};
use swebatch_repo::RepoConfig;
use swebatch_run::{CatalogLoader, InstanceSource};
use tempfile::TempDir;

const IMAGE: &str = "swebench/swesmith.x86_64.org_1776_repo.abc123";

fn sample_instance(instance_id: &str, repo: &str) -> Value {
    json!({
        "instance_id": instance_id,
        "image_name": IMAGE,
        "repo": repo,
        "problem_statement": "Fix the bug",
        "FAIL_TO_PASS": ["test_foo.py::test_bar"],
    })
}

/// Helper to write a dataset file into a fresh temporary directory
fn make_instance_file(instances: &[Value]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("instances.json");
    std::fs::write(&path, serde_json::to_string(instances).unwrap()).unwrap();
    (dir, path)
}

fn loader_with(api: &MockGithubApi, token: Option<&str>) -> CatalogLoader {
    let resolver = VisibilityResolver::new(Arc::new(api.clone()), Arc::new(PrivacyCache::new()));
    CatalogLoader::new(Arc::new(resolver), token.map(str::to_string))
}

fn swesmith(repo: &RepoConfig) -> &swebatch_repo::SweSmithRepoConfig {
    match repo {
        RepoConfig::SweSmith(config) => config,
        other => panic!("expected a SWE-smith repo config, got {:?}", other),
    }
}

#[tokio::test]
async fn test_public_repo() {
    let (_dir, path) = make_instance_file(&[sample_instance("org__repo.abc123__test_1", "org/repo")]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(false));

    let instances = loader_with(&api, None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap();

    assert_eq!(instances.len(), 1);
    let inst = &instances[0];
    assert_eq!(inst.instance_id, "org__repo.abc123__test_1");
    assert_eq!(inst.problem_statement, "Fix the bug");
    assert_eq!(inst.fail_to_pass, vec!["test_foo.py::test_bar"]);
    assert_eq!(inst.deployment.image, IMAGE);

    let repo = swesmith(&inst.repo);
    assert_eq!(repo.repo_name, "testbed");
    assert_eq!(repo.base_commit, "org__repo.abc123__test_1");
    assert_eq!(repo.mirror_url, "");

    let cmds = inst.reset_commands(None);
    assert!(cmds.iter().any(|c| c == "git fetch"));
    assert!(cmds.iter().any(|c| c == "git checkout org__repo.abc123__test_1"));
}

#[tokio::test]
async fn test_private_repo_with_token() {
    let (_dir, path) = make_instance_file(&[sample_instance("org__repo.abc123__test_1", "org/repo")]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(true));

    let instances = loader_with(&api, Some("ghp_fake"))
        .load(&InstanceSource::new(path))
        .await
        .unwrap();

    assert_eq!(instances.len(), 1);
    let inst = &instances[0];
    assert_eq!(swesmith(&inst.repo).mirror_url, "https://github.com/org/repo.git");
    assert_eq!(api.requests(), vec![("org/repo".to_string(), Some("ghp_fake".to_string()))]);

    let cmds = inst.reset_commands(Some("ghp_fake"));
    assert!(cmds
        .iter()
        .any(|c| c == "git fetch https://ghp_fake@github.com/org/repo.git"));
    assert!(cmds.iter().any(|c| c == "git checkout FETCH_HEAD"));
}

#[tokio::test]
async fn test_private_repo_no_token_raises() {
    let (_dir, path) = make_instance_file(&[sample_instance("org__repo.abc123__test_1", "org/repo")]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(true));

    let err = loader_with(&api, None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();

    assert!(matches!(err, SwebatchError::MissingCredential { .. }));
    let msg = err.to_string();
    assert!(msg.contains("GITHUB_TOKEN is not set"), "{msg}");
    assert!(msg.contains("org__repo.abc123__test_1"), "{msg}");
}

#[tokio::test]
async fn test_missing_token_names_configured_variable() {
    let (_dir, path) = make_instance_file(&[sample_instance("a", "org/repo")]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::new(404, "Not Found"));
    let config = SwebatchConfig::from_toml_str("[github]\ntoken_env = \"SWESMITH_TOKEN\"\n").unwrap();
    let resolver = VisibilityResolver::new(Arc::new(api.clone()), Arc::new(PrivacyCache::new()));

    let err = CatalogLoader::from_config(&config, Arc::new(resolver), None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("SWESMITH_TOKEN is not set"));
}

#[tokio::test]
async fn test_filter_and_slice() {
    let (_dir, path) = make_instance_file(&[
        sample_instance("org__repo.abc__test_1", "org/repo"),
        sample_instance("org__repo.abc__test_2", "org/repo"),
        sample_instance("org__repo.abc__test_3", "org/repo"),
    ]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(false));

    let source = InstanceSource::new(path)
        .with_filter(".*test_[12]")
        .with_slice("0:1");
    let instances = loader_with(&api, None).load(&source).await.unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id, "org__repo.abc__test_1");
}

#[tokio::test]
async fn test_filter_is_a_search() {
    let (_dir, path) = make_instance_file(&[
        sample_instance("org__repo.abc__test_1", "org/repo"),
        sample_instance("other__lib.def__test_2", "other/lib"),
        sample_instance("org__repo.abc__test_3", "org/repo"),
    ]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(false));

    let source = InstanceSource::new(path).with_filter("repo");
    let ids: Vec<_> = loader_with(&api, None)
        .load(&source)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.instance_id)
        .collect();

    assert_eq!(ids, vec!["org__repo.abc__test_1", "org__repo.abc__test_3"]);
    // Filtered-out records are never resolved
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_filter_matching_nothing_is_empty() {
    let (_dir, path) = make_instance_file(&[sample_instance("a", "org/repo")]);
    let api = MockGithubApi::new();

    let instances = loader_with(&api, None)
        .load(&InstanceSource::new(path).with_filter("^nothing$"))
        .await
        .unwrap();

    assert!(instances.is_empty());
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_one_lookup_per_repository() {
    let (_dir, path) = make_instance_file(&[
        sample_instance("a", "org/repo"),
        sample_instance("b", "https://github.com/org/repo.git"),
        sample_instance("c", "other/lib"),
        sample_instance("d", "org/repo"),
    ]);
    let api = MockGithubApi::new()
        .with_response("org/repo", ApiResponse::repo(false))
        .with_response("other/lib", ApiResponse::repo(true));

    let instances = loader_with(&api, Some("tok"))
        .load(&InstanceSource::new(path))
        .await
        .unwrap();

    assert_eq!(instances.len(), 4);
    assert_eq!(api.call_count(), 2);
    assert_eq!(swesmith(&instances[1].repo).mirror_url, "");
    assert_eq!(swesmith(&instances[2].repo).mirror_url, "https://github.com/other/lib.git");
}

#[tokio::test]
async fn test_stops_at_first_failure() {
    let (_dir, path) = make_instance_file(&[
        sample_instance("a", "org/repo"),
        sample_instance("b", "org/broken"),
        sample_instance("c", "org/later"),
    ]);
    let api = MockGithubApi::new()
        .with_response("org/repo", ApiResponse::repo(false))
        .with_response("org/broken", ApiResponse::new(500, "Server Error"))
        .with_response("org/later", ApiResponse::repo(false));

    let err = loader_with(&api, None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();

    assert!(matches!(err, SwebatchError::HostingApi { status: 500, .. }));
    assert_eq!(api.call_count(), 2);
}

#[tokio::test]
async fn test_missing_field_is_reported() {
    let mut record = sample_instance("a", "org/repo");
    record.as_object_mut().unwrap().remove("image_name");
    let (_dir, path) = make_instance_file(&[sample_instance("ok", "org/repo"), record]);

    let err = loader_with(&MockGithubApi::new(), None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SwebatchError::MissingField { index: 1, field: "image_name" }
    ));
}

#[tokio::test]
async fn test_invalid_repo_field() {
    let (_dir, path) = make_instance_file(&[sample_instance("a", "not-a-repo")]);
    let err = loader_with(&MockGithubApi::new(), None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();
    assert!(matches!(err, SwebatchError::InvalidRepoName(_)));
}

#[tokio::test]
async fn test_malformed_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.json");
    std::fs::write(&path, "[{\"instance_id\": ").unwrap();

    let err = loader_with(&MockGithubApi::new(), None)
        .load(&InstanceSource::new(path))
        .await
        .unwrap_err();
    assert!(matches!(err, SwebatchError::Serialization(_)));
}

#[tokio::test]
async fn test_jsonl_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.jsonl");
    let lines: Vec<String> = ["a", "b"]
        .iter()
        .map(|id| sample_instance(id, "org/repo").to_string())
        .collect();
    std::fs::write(&path, lines.join("\n")).unwrap();
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(false));

    let instances = loader_with(&api, None)
        .load(&InstanceSource::new(path).with_slice("-1:"))
        .await
        .unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id, "b");
}

#[tokio::test]
async fn test_instances_serialize_for_run_layer() {
    let (_dir, path) = make_instance_file(&[sample_instance("a", "org/repo")]);
    let api = MockGithubApi::new().with_response("org/repo", ApiResponse::repo(true));

    let instances = loader_with(&api, Some("ghp_fake"))
        .load(&InstanceSource::new(path))
        .await
        .unwrap();
    let json = serde_json::to_value(&instances).unwrap();

    assert_eq!(json[0]["repo"]["type"], "swe_smith");
    assert_eq!(json[0]["repo"]["mirror_url"], "https://github.com/org/repo.git");
    assert_eq!(json[0]["deployment"]["image"], IMAGE);
    assert_eq!(json[0]["FAIL_TO_PASS"][0], "test_foo.py::test_bar");
    // Tokens never end up in the produced configuration
    assert!(!json.to_string().contains("ghp_fake"));
}
