mod output;
mod theme;

use crate::logging;
use crate::store::{TaskStore, resolve_db_path};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use log::{debug, info};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wdid",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WDID_COMMIT_HASH"), ")"),
    about = "What did I do? A personal task list manager.",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database file; defaults to db.sqlite3 next to the executable
    #[arg(long, global = true, env = "WDID_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tasks recorded for a day, today by default
    List(ListArgs),
    /// Record a new task
    Add(AddArgs),
    /// Toggle a task between done and not done
    Up(UpArgs),
    /// Print shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
    /// Colour theme file; defaults to cli.json in the config directory
    #[arg(long, env = "WDID_CLI_CONFIG", value_name = "PATH")]
    cli_config: Option<PathBuf>,
}

#[derive(Args)]
struct AddArgs {
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    name: String,
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

#[derive(Args)]
struct UpArgs {
    id: i64,
}

#[derive(Args)]
struct CompletionsArgs {
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
        command => {
            let db_path = resolve_db_path(cli.db)?;
            let store = TaskStore::open(&db_path)?;
            store.ensure_schema()?;
            if log::log_enabled!(log::Level::Debug) {
                debug!(
                    "event=store_ready path={} tasks={}",
                    db_path.display(),
                    store.count_tasks()?
                );
            }

            match command {
                Commands::List(args) => list_tasks(&store, args)?,
                Commands::Add(args) => add_task(&store, args)?,
                Commands::Up(args) => toggle_task(&store, args.id)?,
                Commands::Completions(_) => unreachable!(),
            }
            store.close()
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn list_tasks(store: &TaskStore, args: ListArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let groups = store.get_tasks_for_date(date)?;
    let theme = theme::load_cli_theme(args.cli_config.as_deref());
    output::print_tasks(&groups, date, &theme);
    Ok(())
}

fn add_task(store: &TaskStore, args: AddArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let id = store.insert_task(&args.name, date)?;
    println!("Added task {}", id);
    Ok(())
}

fn toggle_task(store: &TaskStore, id: i64) -> Result<()> {
    let Some(task) = store.get_task_by_id(id)? else {
        info!("event=toggle_task status=not_found id={}", id);
        println!("Task with id {} does not exist!", id);
        return Ok(());
    };

    let done = task.toggled();
    store.update_task(task.id, done)?;
    let state = if done { "done" } else { "not done" };
    println!("Marked task {} as {}", task.id, state);
    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "wdid", &mut io::stdout());
}
