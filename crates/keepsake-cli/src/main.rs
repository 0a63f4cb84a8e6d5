//! `keepsake`: command-line front end for the keepsake pages.
//!
//! Page state lives in a local SQLite file; anime comments go to the
//! keepsake server.
//!
//! # Usage
//!
//! ```
//! keepsake timer --watch
//! keepsake --url http://localhost:8787 comments save chiikawa seiki "so small"
//! keepsake --config ~/.config/keepsake/config.toml todo toggle 3
//! ```

mod app;
mod client;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use app::App;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use keepsake_core::{
  LocalStore,
  comment::{AnimeId, Person},
  elapsed,
  quiz::Category,
  session::Language,
  visits::Page,
};
use keepsake_store_sqlite::SqliteStorage;
use rand_core::OsRng;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "keepsake", about = "Command-line keepsake pages")]
struct Args {
  /// Path to a TOML config file (url, store, start).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Origin of the keepsake server (default: http://localhost:8787).
  #[arg(long, env = "KEEPSAKE_URL")]
  url: Option<String>,

  /// Local state file (default: ~/.local/share/keepsake/state.db).
  #[arg(long, env = "KEEPSAKE_STORE")]
  store: Option<PathBuf>,

  /// Instant the together-timer counts from, RFC 3339.
  #[arg(long)]
  start: Option<DateTime<Utc>>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Time elapsed since the start instant.
  Timer {
    /// Keep printing once per second until interrupted.
    #[arg(long)]
    watch: bool,
  },
  /// Pages visited so far and the previous visit time.
  Visits,
  /// Show or change the display language.
  Lang {
    #[command(subcommand)]
    action: Option<LangAction>,
  },
  /// The shared activity checklist.
  Todo {
    #[command(subcommand)]
    action: TodoAction,
  },
  /// Memorable dates.
  Calendar {
    #[command(subcommand)]
    action: CalendarAction,
  },
  /// The birthday candle.
  Candle {
    #[command(subcommand)]
    action: CandleAction,
  },
  /// The food gacha.
  Gacha {
    #[command(subcommand)]
    action: GachaAction,
  },
  /// The card quiz.
  Quiz {
    #[command(subcommand)]
    action: QuizAction,
  },
  /// Anime watch-log comments, stored on the server.
  Comments {
    #[command(subcommand)]
    action: CommentsAction,
  },
  /// Open a page by name without acting on it (e.g. `map`, `cooking`).
  Open { page: Page },
  /// Remove every locally stored value.
  Clear {
    /// Confirm the wipe.
    #[arg(long)]
    yes: bool,
  },
}

#[derive(Subcommand, Debug)]
pub enum LangAction {
  Set { language: Language },
}

#[derive(Subcommand, Debug)]
pub enum TodoAction {
  List,
  Toggle { index: usize },
  Reset,
}

#[derive(Subcommand, Debug)]
pub enum CalendarAction {
  List,
  Add {
    /// `YYYY-MM-DD`
    date:        String,
    title:       String,
    #[arg(long, default_value = "")]
    description: String,
  },
  Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum CandleAction {
  Status,
  Blow,
  Reset,
}

#[derive(Subcommand, Debug)]
pub enum GachaAction {
  Spin,
  List,
  Reset,
}

#[derive(Subcommand, Debug)]
pub enum QuizAction {
  Draw {
    category:  Category,
    /// JSON question document.
    #[arg(long, value_name = "FILE")]
    questions: PathBuf,
  },
  Answer { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CommentsAction {
  List,
  Save {
    anime:  AnimeId,
    person: Person,
    text:   String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  store: Option<PathBuf>,
  #[serde(default)]
  start: Option<DateTime<Utc>>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8787".to_string()),
  };
  let store_path = expand_tilde(
    args
      .store
      .or(file_cfg.store)
      .unwrap_or_else(|| PathBuf::from("~/.local/share/keepsake/state.db")),
  );
  let start = args.start.or(file_cfg.start).unwrap_or_else(elapsed::default_start);

  let storage = SqliteStorage::open(&store_path)
    .with_context(|| format!("opening local store at {}", store_path.display()))?;
  let client = ApiClient::new(api_config).context("failed to build HTTP client")?;

  let mut app = App::new(LocalStore::new(storage), Arc::new(client), start);
  let mut stdout = std::io::stdout().lock();
  app.run(args.command, &mut OsRng, &mut stdout).await
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: PathBuf) -> PathBuf {
  if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path
}
