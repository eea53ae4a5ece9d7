//! `activity-flow` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate`: check a workflow JSON file and summarise its graph.
//! - `run`: execute one node (and its ancestors) against the backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{Graph, Orchestrator, Session, Workflow};
use nodes::traits::data_from;
use nodes::{BackendConfig, HttpBackend, NodeRegistry};

#[derive(Parser)]
#[command(
    name = "activity-flow",
    about = "Dependency-ordered runner for activity workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Run a node after all of its ancestors.
    Run {
        /// Path to the workflow JSON file.
        path: PathBuf,
        /// Id of the node to run.
        #[arg(long)]
        node: String,
        /// Trigger input as a JSON object.
        #[arg(long)]
        input: Option<String>,
        #[arg(long, env = "ACTIVITY_BACKEND_URL")]
        backend_url: Option<String>,
        /// Per-request timeout in seconds.
        #[arg(long, env = "ACTIVITY_BACKEND_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,
        /// Write the updated workflow (data and statuses) here.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let workflow = load_workflow(&path)?;
            match Graph::build(&workflow) {
                Ok(graph) => {
                    println!(
                        "✅ Workflow is valid: {} nodes, {} edges. Source nodes: {:?}",
                        graph.len(),
                        graph.edge_count(),
                        graph.sources()
                    );
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Run {
            path,
            node,
            input,
            backend_url,
            timeout_secs,
            write,
        } => {
            let workflow = load_workflow(&path)?;
            let trigger = match input {
                Some(raw) => parse_input(&raw)?,
                None => Default::default(),
            };

            let mut config = BackendConfig::default();
            if let Some(url) = backend_url {
                config = config.with_base_url(url);
            }
            if let Some(secs) = timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }
            info!(backend = %config.base_url, "using activity backend");

            let backend = HttpBackend::new(&config).context("failed to build HTTP client")?;
            let registry = NodeRegistry::builtin(Arc::new(backend));
            let session = Session::new(workflow, Orchestrator::new(registry));

            let report = session
                .run(&node, trigger)
                .await
                .with_context(|| format!("cannot run node {node}"))?;
            let snapshot = session.snapshot().await;

            let statuses: serde_json::Map<String, Value> = snapshot
                .nodes
                .iter()
                .map(|n| (n.id.clone(), json!(n.status)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "report": report, "statuses": statuses }))?
            );

            if let Some(out) = write {
                let body = serde_json::to_string_pretty(&snapshot)?;
                std::fs::write(&out, body)
                    .with_context(|| format!("cannot write {}", out.display()))?;
                info!(path = %out.display(), "workflow written");
            }

            if !report.succeeded {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_workflow(path: &Path) -> anyhow::Result<Workflow> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).context("invalid workflow JSON")
}

fn parse_input(raw: &str) -> anyhow::Result<nodes::Data> {
    let value: Value = serde_json::from_str(raw).context("--input is not valid JSON")?;
    if !value.is_object() {
        bail!("--input must be a JSON object");
    }
    Ok(data_from(value))
}
