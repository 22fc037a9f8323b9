//! Command line transport for the note service.
//!
//! # Responsibility
//! - Parse commands and settings, open storage, and call the API layer.
//! - Print JSON responses on stdout and JSON error bodies on stderr.
//!
//! # Invariants
//! - Exit code reflects the outcome class (0 ok, 1 internal, 2 bad request,
//!   4 not found).

mod api;
mod config;

use api::ApiError;
use clap::{Parser, Subcommand};
use config::AppConfig;
use log::info;
use notestat_core::db::open_db;
use notestat_core::{
    core_version, init_logging, ping, NoteService, SqliteNoteRepository, DEFAULT_PAGE_SIZE,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notestat", version, about = "Short notes with word statistics")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "NOTESTAT_DB_PATH")]
    db_path: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "NOTESTAT_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, global = true, env = "NOTESTAT_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        /// Repeat for several tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List notes newest first, optionally filtered by tags.
    List {
        /// Notes carrying any of the given tags; repeat for several.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
    },
    /// Show one note.
    Get { id: String },
    /// Replace title, text and tags of a note.
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a note.
    Delete { id: String },
    /// Ranked word frequencies of a note's text.
    Stats { id: String },
    /// Number of stored notes.
    Count,
    /// List accepted tags.
    Tags,
    Ping,
    Version,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::List { .. } => "list",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Stats { .. } => "stats",
            Self::Count => "count",
            Self::Tags => "tags",
            Self::Ping => "ping",
            Self::Version => "version",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.db_path, cli.log_level, cli.log_dir);

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    match run(&config, cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = api::render(&err.body()).unwrap_or_else(|_| err.message.clone());
            eprintln!("{body}");
            ExitCode::from(err.kind.exit_code())
        }
    }
}

fn run(config: &AppConfig, command: Command) -> Result<String, ApiError> {
    match command {
        Command::Ping => return Ok(ping().to_string()),
        Command::Version => return Ok(core_version().to_string()),
        Command::Tags => return api::render(&api::allowed_tags()),
        _ => {}
    }

    info!(
        "event=cli_command module=cli status=start command={} db_path={}",
        command.name(),
        config.db_path.display()
    );
    let conn = open_db(&config.db_path).map_err(ApiError::internal)?;
    let repo = SqliteNoteRepository::try_new(&conn).map_err(ApiError::internal)?;
    let service = NoteService::new(repo);

    match command {
        Command::Create { title, text, tags } => {
            api::render(&api::create_note(&service, title, text, &tags)?)
        }
        Command::List { tags, page, size } => {
            api::render(&api::list_notes(&service, &tags, page, size)?)
        }
        Command::Get { id } => api::render(&api::get_note(&service, &id)?),
        Command::Update {
            id,
            title,
            text,
            tags,
        } => api::render(&api::update_note(&service, &id, title, text, &tags)?),
        Command::Delete { id } => {
            api::delete_note(&service, &id)?;
            Ok(String::new())
        }
        Command::Stats { id } => api::render(&api::note_stats(&service, &id)?),
        Command::Count => api::render(&api::count_notes(&service)?),
        Command::Tags | Command::Ping | Command::Version => Ok(String::new()),
    }
}
