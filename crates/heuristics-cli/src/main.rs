//! `mab`: terminal UI for building mobile adaptation heuristics.
//!
//! # Usage
//!
//! ```
//! mab                                   # open the TUI
//! mab --config ~/.config/mab/mab.toml list
//! mab export --format json --output .
//! ```

mod app;
mod settings;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, Store};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use heuristics_cms::CmsAdapter;
use heuristics_core::{
  export::ExportFormat,
  store::{HeuristicStore, LoadSource},
  wizard::Wizard,
};
use heuristics_store_sqlite::SqliteFallback;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mab", version, about = "Build and browse mobile adaptation heuristics")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "mab.toml")]
  config: PathBuf,

  /// Local SQLite file (overrides `store_path`).
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Append logs to this file while the TUI is running.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Forward reverts to the remote collection.
  #[arg(long)]
  sync_reverts: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
  /// Open the terminal UI (default).
  Tui,
  /// Print one line per heuristic.
  List,
  /// Write the collection as CSV or JSON.
  Export {
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,

    /// Destination file or directory; stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let command = cli.command.clone().unwrap_or(Command::Tui);
  init_tracing(&command, cli.log_file.as_deref())?;

  let mut settings = Settings::load(&cli.config)?;
  if let Some(path) = cli.store {
    settings.store_path = path;
  }
  settings.sync_reverts |= cli.sync_reverts;

  let mut store = open_store(&settings).await?;
  let source = store.bootstrap().await;
  info!(?source, count = store.len(), "heuristics loaded");

  match command {
    Command::Tui => run_tui(store, source, &settings).await,
    Command::List => {
      for h in store.all() {
        println!("{}", ui::describe(h));
      }
      Ok(())
    }
    Command::Export { format, output } => export(&store, format, output.as_deref()),
  }
}

/// Subcommands log to stderr. The TUI only logs when given a file, since
/// anything written to the terminal would corrupt the screen.
fn init_tracing(command: &Command, log_file: Option<&Path>) -> Result<()> {
  let filter = || {
    EnvFilter::builder()
      .with_default_directive(LevelFilter::INFO.into())
      .from_env_lossy()
  };

  match (command, log_file) {
    (Command::Tui, None) => {}
    (Command::Tui, Some(path)) => {
      let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    _ => tracing_subscriber::fmt()
      .with_env_filter(filter())
      .with_writer(io::stderr)
      .init(),
  }
  Ok(())
}

async fn open_store(settings: &Settings) -> Result<Store> {
  let path = settings.store_path();
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }

  let fallback = SqliteFallback::open(&path)
    .await
    .with_context(|| format!("failed to open local store at {path:?}"))?;
  let adapter = CmsAdapter::new(settings.collection()).context("failed to build CMS client")?;

  Ok(HeuristicStore::with_fallback(adapter, fallback).with_policy(settings.policy()))
}

fn export(store: &Store, format: ExportFormat, output: Option<&Path>) -> Result<()> {
  let body = format.render(store.all()).context("rendering export")?;

  let Some(output) = output else {
    println!("{body}");
    return Ok(());
  };
  let path = if output.is_dir() {
    output.join(format.file_name(Local::now().date_naive()))
  } else {
    output.to_path_buf()
  };
  std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
  info!(path = %path.display(), count = store.len(), %format, "exported heuristics");
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(store: Store, source: LoadSource, settings: &Settings) -> Result<()> {
  let mut app = App::new(store, Wizard::with_debounce(settings.debounce()));
  app.status_msg = match source {
    LoadSource::Remote => format!("Loaded {} heuristics from the remote collection", app.store.len()),
    LoadSource::Fallback => format!("Loaded {} heuristics from the local store", app.store.len()),
    LoadSource::Empty => "No heuristics yet. Press n to create one".to_owned(),
  };
  if let Some(e) = app.store.last_error() {
    app.status_msg = format!("{}; remote unavailable: {e}", app.status_msg);
  }

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key).await? {
        break;
      }
    }
  }

  Ok(())
}
