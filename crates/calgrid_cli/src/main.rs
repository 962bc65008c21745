//! Terminal surface for the calgrid month-grid task calendar.
//!
//! # Responsibility
//! - Parse the command surface and wire storage, dialogs and the service.
//! - Keep all rendering and dialog handling outside the core crate.

mod app;
mod dialog;

use app::{App, AppError};
use calgrid_core::db::open_db;
use calgrid_core::{
    default_log_level, init_logging, CalendarService, MemorySnapshotRepository,
    SnapshotRepository, SqliteSnapshotRepository,
};
use clap::{Parser, Subcommand};
use dialog::{Dialog, TerminalDialog};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calgrid", version, about = "Month-grid task calendar in your terminal")]
struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep state in memory only; nothing is persisted
    #[arg(long, conflicts_with = "db")]
    ephemeral: bool,

    /// Directory for rolling log files; logging stays off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the month grid with its tasks
    Show,
    /// Attach a task to a day
    Add {
        /// Task date, e.g. 2026-08-14
        #[arg(short, long)]
        date: String,

        /// Task description
        #[arg(short = 'm', long)]
        desc: String,
    },
    /// Rewrite a task's description
    Edit {
        /// Task id, or a unique prefix of it
        task: String,
    },
    /// Remove a task
    Delete {
        /// Task id, or a unique prefix of it
        task: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        init_logging(default_log_level(), &dir.display().to_string())
            .map_err(AppError::Logging)?;
    }

    let dialog = TerminalDialog::new();
    if cli.ephemeral {
        let service = CalendarService::initialize(MemorySnapshotRepository::new())?;
        return dispatch(App::new(service, dialog), cli.command);
    }

    let path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let conn = open_db(&path)?;
    let repo = SqliteSnapshotRepository::try_new(&conn)?;
    let service = CalendarService::initialize(repo)?;
    dispatch(App::new(service, dialog), cli.command)
}

fn dispatch<R: SnapshotRepository, D: Dialog>(
    mut app: App<R, D>,
    command: Commands,
) -> Result<(), AppError> {
    match command {
        Commands::Show => {}
        Commands::Add { date, desc } => app.add_task(&date, &desc)?,
        Commands::Edit { task } => app.edit_task(&task)?,
        Commands::Delete { task } => app.delete_task(&task)?,
    }
    // Every command ends by re-rendering the grid from the current state.
    app.render(&mut io::stdout())?;
    Ok(())
}

fn default_db_path() -> Result<PathBuf, AppError> {
    let base = dirs::data_dir().ok_or(AppError::NoDataDir)?;
    Ok(base.join("calgrid").join("calgrid.sqlite3"))
}
