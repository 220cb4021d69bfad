//! swebatch CLI - benchmark instance preparation
//!
//! Usage:
//!   swebatch init [path]                    Write a default .swebatch/config.toml
//!   swebatch instances <dataset>            Load a catalog and print task instances
//!   swebatch reset-commands <base-ref>      Print the git reset commands for a checkout
//!   swebatch visibility <owner/name>        Classify a repository as public or private
//!   swebatch merge-preds <dir>              Merge *.pred files into one JSON file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use swebatch_core::SwebatchConfig;
use swebatch_github::{github_token, GithubClient, PrivacyCache, VisibilityResolver};
use swebatch_repo::{redact_token, reset_commands};
use swebatch_run::{merge_predictions, CatalogLoader, InstanceSource};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "swebatch")]
#[command(author, version, about = "Prepare benchmark task instances for a coding agent")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory containing .swebatch/config.toml
    #[arg(long, global = true, default_value = ".")]
    config_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Load a dataset and print the resulting task instances as JSON
    Instances {
        /// Dataset file (.json, .jsonl, .yaml)
        path: PathBuf,

        /// Regular expression searched in instance ids
        #[arg(long)]
        filter: Option<String>,

        /// Slice applied after filtering, e.g. "0:10" or "::2"
        #[arg(long, allow_hyphen_values = true)]
        slice: Option<String>,

        /// Shuffle deterministically before filtering
        #[arg(long)]
        shuffle: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the commands that reset a checkout to a base reference
    ResetCommands {
        /// Commit or branch to restore
        base_ref: String,

        /// Fetch from this mirror and check out FETCH_HEAD
        #[arg(long)]
        mirror_url: Option<String>,

        /// Print the access token instead of redacting it
        #[arg(long)]
        reveal_token: bool,
    },

    /// Classify a repository as public or private
    Visibility {
        /// Repository in owner/name form
        repo: String,
    },

    /// Merge prediction files into a single JSON file
    MergePreds {
        /// Directory containing *.pred files
        directory: PathBuf,

        /// Output file (defaults to <directory>/preds.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for command output
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SwebatchConfig::load_or_default(&cli.config_root)
        .with_context(|| format!("Failed to load config from {}", cli.config_root.display()))?;

    match cli.command {
        Commands::Init { path } => cmd_init(path),
        Commands::Instances {
            path,
            filter,
            slice,
            shuffle,
            output,
        } => {
            let source = InstanceSource {
                path,
                filter,
                slice,
                shuffle,
            };
            cmd_instances(&config, source, output).await
        }
        Commands::ResetCommands {
            base_ref,
            mirror_url,
            reveal_token,
        } => cmd_reset_commands(&config, &base_ref, mirror_url.as_deref(), reveal_token),
        Commands::Visibility { repo } => cmd_visibility(&config, &repo).await,
        Commands::MergePreds { directory, output } => cmd_merge_preds(directory, output),
    }
}

fn cmd_init(path: PathBuf) -> Result<()> {
    SwebatchConfig::write_default(&path)
        .with_context(|| format!("Failed to write config in {}", path.display()))?;
    println!("Created {}", path.join(".swebatch/config.toml").display());
    Ok(())
}

fn build_resolver(config: &SwebatchConfig) -> Result<Arc<VisibilityResolver>> {
    let client = GithubClient::new(&config.github).context("Failed to create hosting API client")?;
    Ok(Arc::new(VisibilityResolver::new(
        Arc::new(client),
        Arc::new(PrivacyCache::new()),
    )))
}

async fn cmd_instances(
    config: &SwebatchConfig,
    source: InstanceSource,
    output: Option<PathBuf>,
) -> Result<()> {
    let token = github_token(&config.github.token_env);
    let loader = CatalogLoader::from_config(config, build_resolver(config)?, token);

    let instances = loader
        .load(&source)
        .await
        .with_context(|| format!("Failed to load instances from {}", source.path.display()))?;
    let json = serde_json::to_string_pretty(&instances)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} instances to {}", instances.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_reset_commands(
    config: &SwebatchConfig,
    base_ref: &str,
    mirror_url: Option<&str>,
    reveal_token: bool,
) -> Result<()> {
    let token = github_token(&config.github.token_env);
    for command in reset_commands(base_ref, mirror_url, token.as_deref()) {
        match token.as_deref() {
            Some(token) if !reveal_token => println!("{}", redact_token(&command, token)),
            _ => println!("{}", command),
        }
    }
    Ok(())
}

async fn cmd_visibility(config: &SwebatchConfig, repo: &str) -> Result<()> {
    let token = github_token(&config.github.token_env);
    let private = build_resolver(config)?
        .is_private(repo, token.as_deref())
        .await
        .with_context(|| format!("Failed to resolve visibility of {}", repo))?;
    println!("{}", if private { "private" } else { "public" });
    Ok(())
}

fn cmd_merge_preds(directory: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let count = merge_predictions(&directory, output.as_deref())
        .with_context(|| format!("Failed to merge predictions in {}", directory.display()))?;
    info!("Merged {} prediction files", count);
    Ok(())
}
