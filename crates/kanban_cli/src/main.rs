//! Command-line front end for the kanban board.
//!
//! # Responsibility
//! - Drive the board interaction surface against a storage file.
//! - Render the board as plain text (or the raw snapshot with `--json`).

use clap::{Parser, Subcommand};
use kanban_core::db::resolve_db_path;
use kanban_core::{
    default_log_level, encode_snapshot, init_logging, Board, BoardError, BoardService, ColumnKey,
    LocalStorage, LoggingError, SqliteLocalStorage, TaskId,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to open board storage: {0}")]
    Storage(#[from] kanban_core::db::DbError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),
    #[error("{0} has no task {1}")]
    TaskNotFound(ColumnKey, TaskId),
}

#[derive(Parser, Debug)]
#[command(name = "kanban", about = "Three-column kanban board", version)]
struct Cli {
    /// Storage file; defaults to $KANBAN_DB_PATH or a temp-dir file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "KANBAN_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board.
    Show {
        /// Print the stored snapshot instead of the text view.
        #[arg(long)]
        json: bool,
    },
    /// Add a task to a column.
    Add {
        column: ColumnKey,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete a task.
    Remove { column: ColumnKey, id: i64 },
    /// Move a task to the end of another column.
    Move {
        source: ColumnKey,
        target: ColumnKey,
        id: i64,
    },
    /// Restore the seed board.
    Reset,
    /// Print core health-check info.
    Ping,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    if let Command::Ping = cli.command {
        println!("kanban_core ping={}", kanban_core::ping());
        println!("kanban_core version={}", kanban_core::core_version());
        return Ok(());
    }

    let path = cli.db.unwrap_or_else(resolve_db_path);
    let mut service = BoardService::initialize(SqliteLocalStorage::open(&path)?)?;

    match cli.command {
        Command::Show { json: true } => println!("{}", snapshot_json(service.board())?),
        Command::Show { json: false } => print!("{}", render_board(service.board())),
        Command::Add { column, text } => match service.add_task(column, &text.join(" "))? {
            Some(id) => println!("added {id} to {column}"),
            None => println!("nothing to add: task text is blank"),
        },
        Command::Remove { column, id } => {
            if !service.remove_task(column, TaskId(id))? {
                return Err(CliError::TaskNotFound(column, TaskId(id)));
            }
            println!("removed {id} from {column}");
        }
        Command::Move { source, target, id } => {
            move_or_locate(&mut service, source, target, TaskId(id))?;
            println!("{id} is in {target}");
        }
        Command::Reset => {
            service.reset()?;
            println!("board reset");
        }
        Command::Ping => {}
    }
    Ok(())
}

/// Moves `id`, or for a same-column move confirms it is already there.
fn move_or_locate<S: LocalStorage>(
    service: &mut BoardService<S>,
    source: ColumnKey,
    target: ColumnKey,
    id: TaskId,
) -> Result<(), CliError> {
    let found = if source == target {
        matches!(service.board().find_task(id), Some((key, _)) if key == source)
    } else {
        service.move_task(source, target, id)?
    };
    if found {
        Ok(())
    } else {
        Err(CliError::TaskNotFound(source, id))
    }
}

fn snapshot_json(board: &Board) -> Result<String, CliError> {
    encode_snapshot(board).map_err(|err| CliError::Board(err.into()))
}

fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for (_, column) in board.columns() {
        out.push_str(&format!("{} ({})\n", column.name, column.items.len()));
        if column.items.is_empty() {
            out.push_str("  (empty)\n");
        }
        for task in &column.items {
            out.push_str(&format!("  [{}] {}\n", task.id, task.content));
        }
    }
    out
}
