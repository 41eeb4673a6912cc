//! Vigil - content moderation from the command line.
//!
//! Wires configuration, logging, SQLite storage and the media analyzers
//! into a [`ContentLifecycle`], runs one command against it, and prints
//! the result as JSON on stdout. Logs go to stderr and the log directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use serde_json::json;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vigil_app::{infer_content_type, load_upload, FilenameHeuristicAnalyzer};
use vigil_core::{
    AnalyzerRegistry, ContentFilter, ContentId, ContentLifecycle, ContentStatus, ContentType,
    ModerationConfig, ModerationOutcome, ModeratorDecision, Submission,
};
use vigil_storage::Database;

/// Vigil - content moderation engine
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about)]
struct Args {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit text for classification
    SubmitText {
        /// The text to classify
        text: String,
    },

    /// Submit an image, video, or audio file
    SubmitFile {
        /// Path to the file
        path: PathBuf,

        /// Media type; inferred from the file extension when omitted
        #[arg(long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
    },

    /// Show one content record and its moderation history
    Show {
        id: String,
    },

    /// Apply a moderator decision (approve, edit, block)
    Moderate {
        id: String,

        #[arg(value_parser = parse_decision)]
        decision: ModeratorDecision,

        /// Notes recorded with the decision
        #[arg(long)]
        notes: Option<String>,

        /// Moderator identity; defaults to the configured one
        #[arg(long)]
        moderator: Option<String>,
    },

    /// List suspicious content awaiting review, oldest first
    Queue {
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// List content moderators approved or blocked, most recent first
    Reviewed {
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// List content, newest first
    List {
        #[arg(long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,

        #[arg(long, value_parser = parse_status)]
        status: Option<ContentStatus>,

        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show recent moderation actions, newest first
    Log {
        /// Number of entries; defaults to the configured count
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show content and moderation counts
    Stats,
}

fn parse_content_type(s: &str) -> Result<ContentType, String> {
    ContentType::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown content type: {}", s))
}

fn parse_status(s: &str) -> Result<ContentStatus, String> {
    ContentStatus::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown status: {}", s))
}

fn parse_decision(s: &str) -> Result<ModeratorDecision, String> {
    ModeratorDecision::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown decision: {}", s))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "vigil", "vigil")
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
///
/// Console output goes to stderr so stdout stays valid JSON.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigil={},warn", log_level)));

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("vigil")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                if args.debug {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stderr))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                } else {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                }

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

fn load_config(args: &Args) -> anyhow::Result<ModerationConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => match project_dirs() {
            Some(dirs) => dirs.config_dir().join("config.json"),
            None => return Ok(ModerationConfig::default()),
        },
    };

    ModerationConfig::load(&path).with_context(|| format!("loading config from {:?}", path))
}

fn open_database(args: &Args) -> anyhow::Result<Database> {
    let db = match &args.db {
        Some(path) => Database::with_path(path),
        None => Database::new(),
    };
    db.context("opening database")
}

fn analyzers() -> AnalyzerRegistry {
    ContentType::all()
        .iter()
        .filter_map(|t| FilenameHeuristicAnalyzer::for_type(*t).map(|a| (*t, a)))
        .fold(AnalyzerRegistry::new(), |registry, (t, analyzer)| {
            registry.register(t, Arc::new(analyzer))
        })
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(args: Args, lifecycle: ContentLifecycle) -> anyhow::Result<()> {
    match args.command {
        Command::SubmitText { text } => {
            let id = lifecycle.submit(Submission::text(text)).await?;
            print_json(&lifecycle.get(&id))
        }

        Command::SubmitFile { path, content_type } => {
            let upload = load_upload(&path).with_context(|| format!("reading {:?}", path))?;
            let content_type = match content_type {
                Some(t) => t,
                None => match infer_content_type(upload.mime_type.as_deref()) {
                    Some(t) => t,
                    None => bail!(
                        "cannot infer media type of {:?}; pass --type image|video|audio",
                        path
                    ),
                },
            };

            let id = lifecycle
                .submit(Submission::media(content_type, upload))
                .await?;
            print_json(&lifecycle.get(&id))
        }

        Command::Show { id } => {
            let id = ContentId::from(id);
            let Some(content) = lifecycle.get(&id) else {
                bail!("content {} not found", id);
            };
            print_json(&json!({
                "content": content,
                "actions": lifecycle.actions_for(&id),
            }))
        }

        Command::Moderate {
            id,
            decision,
            notes,
            moderator,
        } => {
            let id = ContentId::from(id);
            let outcome = match moderator {
                Some(moderator) => lifecycle.moderate(&id, decision, notes, &moderator)?,
                None => lifecycle.moderate_as_default(&id, decision, notes)?,
            };
            match outcome {
                ModerationOutcome::Applied(action) => print_json(&json!({
                    "action": action,
                    "content": lifecycle.get(&id),
                })),
                ModerationOutcome::NotFound => bail!("content {} not found", id),
            }
        }

        Command::Queue { search, limit } => print_json(&lifecycle.review_queue(&ContentFilter {
            search,
            limit,
            ..Default::default()
        })),

        Command::Reviewed { search, limit } => print_json(&lifecycle.reviewed(&ContentFilter {
            search,
            limit,
            ..Default::default()
        })),

        Command::List {
            content_type,
            status,
            search,
            limit,
        } => print_json(&lifecycle.list(&ContentFilter {
            content_type,
            status,
            search,
            limit,
        })),

        Command::Log { limit } => {
            let n = limit.unwrap_or(lifecycle.config().recent_actions);
            print_json(&lifecycle.recent_actions(n))
        }

        Command::Stats => print_json(&lifecycle.stats()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    let config = load_config(&args)?;
    let db = open_database(&args)?;
    let lifecycle = ContentLifecycle::open(Arc::new(db), analyzers(), config)?;

    run(args, lifecycle).await
}
