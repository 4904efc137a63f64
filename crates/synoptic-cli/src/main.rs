//! Synoptic - simulated multi-agent briefing orchestrator CLI
//!
//! The `synoptic` command drives the orchestration engine from a terminal.
//!
//! ## Commands
//!
//! - `run`: Drive one run to the approval gate, decide it, optionally replay it
//! - `query`: Ask the live backend for a briefing and save it
//! - `health`: Check the backend health endpoint
//! - `history`: Browse, search, export, and delete saved briefings

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

use synoptic_core::{
    download_artifact, BackendConfig, BackendSynthesizer, BriefingBackend, Clipboard, Dashboard,
    DashboardView, EngineConfig, EngineEvent, ExportError, HttpBriefingBackend, RunController,
};
use synoptic_store::{ArtifactStore, BriefingId, JsonFileArtifactStore, SavedBriefing};

#[derive(Parser)]
#[command(name = "synoptic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Simulated multi-agent briefing orchestrator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and views
    #[arg(long, global = true)]
    json: bool,

    /// Saved briefing history file
    #[arg(
        long,
        global = true,
        env = "SYNOPTIC_STORE",
        default_value = ".synoptic/briefings.json"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive one orchestration run through the approval gate
    Run {
        /// Briefing request text
        #[arg(short, long)]
        prompt: String,

        /// Operator decision at the approval gate
        #[arg(short, long, value_enum, default_value = "approve")]
        decision: DecisionArg,

        /// Autoplay the recorded snapshots after the run finishes
        #[arg(long)]
        replay: bool,

        /// Synthesize through the live backend instead of the simulator
        #[arg(long)]
        live: bool,

        /// Backend base URL
        #[arg(long, env = "SYNOPTIC_API_URL", default_value = "http://localhost:8000")]
        api_url: String,
    },

    /// Request a briefing from the live backend and save it
    Query {
        /// Briefing request text
        #[arg(short, long)]
        prompt: String,

        /// Backend base URL
        #[arg(long, env = "SYNOPTIC_API_URL", default_value = "http://localhost:8000")]
        api_url: String,
    },

    /// Check backend health
    Health {
        /// Backend base URL
        #[arg(long, env = "SYNOPTIC_API_URL", default_value = "http://localhost:8000")]
        api_url: String,
    },

    /// Saved briefing history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DecisionArg {
    Approve,
    Reject,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved briefings, newest first
    List,

    /// Print a saved briefing
    Show {
        /// Briefing ID
        id: String,
    },

    /// Delete a saved briefing
    Delete {
        /// Briefing ID
        id: String,
    },

    /// Search titles and queries
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Write a saved briefing to a timestamped text file
    Export {
        /// Briefing ID
        id: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Copy a saved briefing to the system clipboard
    Copy {
        /// Briefing ID
        id: String,
    },
}

/// System clipboard backed by `arboard`.
struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self, ExportError> {
        let inner = arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    synoptic_core::init_tracing(cli.json, level);

    let store = JsonFileArtifactStore::open(&cli.store)
        .await
        .with_context(|| format!("Failed to open briefing history at {:?}", cli.store))?;
    let store: Arc<dyn ArtifactStore> = Arc::new(store);

    match cli.command {
        Commands::Run {
            prompt,
            decision,
            replay,
            live,
            api_url,
        } => {
            let backend = if live {
                Some(connect(&api_url)?)
            } else {
                None
            };
            cmd_run(
                EngineConfig::from_env(),
                store,
                &prompt,
                decision,
                replay,
                backend,
                cli.json,
            )
            .await
        }
        Commands::Query { prompt, api_url } => {
            cmd_query(store.as_ref(), connect(&api_url)?.as_ref(), &prompt, cli.json).await
        }
        Commands::Health { api_url } => cmd_health(connect(&api_url)?.as_ref(), cli.json).await,
        Commands::History { action } => match action {
            HistoryAction::List => cmd_history_list(store.as_ref(), cli.json).await,
            HistoryAction::Show { id } => cmd_history_show(store.as_ref(), &id, cli.json).await,
            HistoryAction::Delete { id } => cmd_history_delete(store.as_ref(), &id).await,
            HistoryAction::Search { term } => {
                cmd_history_search(store.as_ref(), &term, cli.json).await
            }
            HistoryAction::Export { id, dir } => {
                cmd_history_export(store.as_ref(), &id, &dir).await
            }
            HistoryAction::Copy { id } => cmd_history_copy(store.as_ref(), &id).await,
        },
    }
}

fn connect(api_url: &str) -> Result<Arc<dyn BriefingBackend>> {
    let backend = HttpBriefingBackend::new(BackendConfig::new(api_url))
        .context("Failed to build backend client")?;
    Ok(Arc::new(backend))
}

/// Drive one run end to end, printing the view after each control step
async fn cmd_run(
    config: EngineConfig,
    store: Arc<dyn ArtifactStore>,
    prompt: &str,
    decision: DecisionArg,
    replay: bool,
    backend: Option<Arc<dyn BriefingBackend>>,
    json: bool,
) -> Result<()> {
    let mut controller = RunController::new(config).with_store(store);
    if let Some(backend) = backend {
        controller = controller.with_synthesizer(Arc::new(BackendSynthesizer::new(backend)));
    }
    let mut dashboard = Dashboard::new(controller);
    let mut events = dashboard.subscribe();

    dashboard.start_run(prompt).await;
    print_view(&dashboard.view(), json)?;

    match decision {
        DecisionArg::Approve => dashboard.approve().await,
        DecisionArg::Reject => dashboard.reject().await,
    }
    print_view(&dashboard.view(), json)?;

    while let Ok(event) = events.try_recv() {
        if let EngineEvent::Notification { level, message } = event {
            info!(level = ?level, "{}", message);
        }
    }

    if let Some(artifact) = dashboard.artifact() {
        if !json {
            println!();
            println!("{}", artifact.content);
        }
    }

    if replay {
        dashboard.enter_replay();
        let mut moves = dashboard.subscribe();
        print_view(&dashboard.view(), json)?;
        dashboard.toggle_play();

        while let Ok(event) = moves.recv().await {
            if let EngineEvent::ReplayMoved { playing, .. } = event {
                print_view(&dashboard.view(), json)?;
                if !playing {
                    break;
                }
            }
        }
        dashboard.exit_replay();
    }

    let digest = dashboard
        .history_digest()
        .context("Failed to digest snapshot history")?;
    info!(digest = %digest, "run history recorded");
    synoptic_core::metrics::METRICS.flush();

    Ok(())
}

fn print_view(view: &DashboardView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }

    println!("== {} ==", view.status_line);
    for agent in &view.agents {
        println!(
            "  {:<18} {:<7} {}",
            agent.display_name,
            agent.status.to_string(),
            agent.current_task.as_deref().unwrap_or("-")
        );
    }
    let tail = view.logs.len().saturating_sub(3);
    for entry in &view.logs[tail..] {
        println!("  {}", entry);
    }
    Ok(())
}

/// Request a briefing from the backend and save it to history
async fn cmd_query(
    store: &dyn ArtifactStore,
    backend: &dyn BriefingBackend,
    prompt: &str,
    json: bool,
) -> Result<()> {
    let response = backend
        .generate(prompt)
        .await
        .context("Briefing request failed")?;
    if !response.success || response.content.trim().is_empty() {
        bail!("Backend returned no briefing content");
    }

    let saved = store.save(prompt, &response.content).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        println!("Saved briefing {} ({})", saved.id, saved.title);
        println!();
        println!("{}", saved.content);
    }
    Ok(())
}

async fn cmd_health(backend: &dyn BriefingBackend, json: bool) -> Result<()> {
    let health = backend.health().await.context("Health check failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!("Status:  {}", health.status);
    println!("Uptime:  {:.0}s", health.uptime_seconds);
    println!("Version: {}", health.version);
    if !health.is_healthy() {
        bail!("Backend reports status '{}'", health.status);
    }
    Ok(())
}

fn print_briefings(briefings: &[SavedBriefing], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(briefings)?);
        return Ok(());
    }
    if briefings.is_empty() {
        println!("No saved briefings");
        return Ok(());
    }
    for briefing in briefings {
        println!(
            "{}  {}  {}",
            briefing.id,
            briefing.created_at.format("%Y-%m-%d %H:%M"),
            briefing.title
        );
    }
    Ok(())
}

async fn cmd_history_list(store: &dyn ArtifactStore, json: bool) -> Result<()> {
    let briefings = store.load().await?;
    print_briefings(&briefings, json)
}

async fn cmd_history_search(store: &dyn ArtifactStore, term: &str, json: bool) -> Result<()> {
    let briefings = store.search(term).await?;
    print_briefings(&briefings, json)
}

async fn cmd_history_show(store: &dyn ArtifactStore, id: &str, json: bool) -> Result<()> {
    let briefing = store.get(&BriefingId::from(id)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&briefing)?);
    } else {
        println!("# {}", briefing.title);
        println!("Query: {}", briefing.query);
        println!();
        println!("{}", briefing.content);
    }
    Ok(())
}

async fn cmd_history_delete(store: &dyn ArtifactStore, id: &str) -> Result<()> {
    store.delete(&BriefingId::from(id)).await?;
    println!("Deleted {}", id);
    Ok(())
}

async fn cmd_history_export(store: &dyn ArtifactStore, id: &str, dir: &Path) -> Result<()> {
    let briefing = store.get(&BriefingId::from(id)).await?;
    let path = download_artifact(dir, &briefing.content, Utc::now())
        .await
        .with_context(|| format!("Failed to export briefing to {:?}", dir))?;
    println!("Exported to {}", path.display());
    Ok(())
}

async fn cmd_history_copy(store: &dyn ArtifactStore, id: &str) -> Result<()> {
    let briefing = store.get(&BriefingId::from(id)).await?;
    let mut clipboard = SystemClipboard::new()?;
    clipboard.write_text(&briefing.content)?;
    println!("Copied \"{}\" to clipboard", briefing.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_approve() {
        let cli = Cli::try_parse_from(["synoptic", "run", "--prompt", "tech in Pune"]).unwrap();
        match cli.command {
            Commands::Run {
                prompt,
                decision,
                replay,
                live,
                ..
            } => {
                assert_eq!(prompt, "tech in Pune");
                assert_eq!(decision, DecisionArg::Approve);
                assert!(!replay);
                assert!(!live);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_accepts_reject_and_replay() {
        let cli = Cli::try_parse_from([
            "synoptic", "run", "-p", "x", "--decision", "reject", "--replay",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                decision: DecisionArg::Reject,
                replay: true,
                ..
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "synoptic", "history", "list", "--json", "--store", "/tmp/b.json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.store, PathBuf::from("/tmp/b.json"));
    }

    #[tokio::test]
    async fn history_commands_round_trip_through_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileArtifactStore::open(dir.path().join("b.json"))
            .await
            .unwrap();
        let saved = store.save("finance for Goa", "content").await.unwrap();

        cmd_history_list(&store, false).await.unwrap();
        cmd_history_show(&store, &saved.id.to_string(), true)
            .await
            .unwrap();

        let out = dir.path().join("out");
        cmd_history_export(&store, &saved.id.to_string(), &out)
            .await
            .unwrap();
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);

        cmd_history_delete(&store, &saved.id.to_string())
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(cmd_history_show(&store, &saved.id.to_string(), false)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn simulated_run_saves_briefing() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ArtifactStore> = Arc::new(
            JsonFileArtifactStore::open(dir.path().join("b.json"))
                .await
                .unwrap(),
        );

        cmd_run(
            EngineConfig::instant().with_rng_seed(9),
            store.clone(),
            "health news for Goa",
            DecisionArg::Approve,
            false,
            None,
            true,
        )
        .await
        .unwrap();

        let saved = store.load().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].query, "health news for Goa");
    }
}
