//! todo-sync command line front end.
//!
//! Every subcommand drives one `TaskReconciler` over the configured SQLite
//! store and remote task list.

use anyhow::{Result, bail};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use todo_sync::cli::{Cli, Command};
use todo_sync::config::{Config, ConfigLoader};
use todo_sync::db::Database;
use todo_sync::error::ReconcileError;
use todo_sync::format::{
    OutputFormat, format_load_markdown, format_sync_markdown, format_task_markdown,
    format_tasks_markdown,
};
use todo_sync::logging::{LogTarget, init_logging};
use todo_sync::reconciler::TaskReconciler;
use todo_sync::remote::{DisabledSource, HttpTaskSource, RemoteTaskSource};
use todo_sync::store::TaskStore;
use todo_sync::types::TaskRecord;
use tracing::{debug, info};

type Reconciler = TaskReconciler<Database, Box<dyn RemoteTaskSource>>;

fn load_config(cli: &Cli) -> Result<Config> {
    // SAFETY: set at startup before any other threads read the environment.
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var("TODO_SYNC_CONFIG_PATH", config_path);
        }
    }
    let loader = ConfigLoader::load()?;
    if let Some(path) = loader.config_path() {
        debug!(path = %path.display(), "Using config file");
    }

    let mut config = loader.into_config();
    if let Some(db) = &cli.database {
        config.store.db_path = db.into();
    }
    if let Some(url) = &cli.remote_url {
        config.remote.url = url.clone();
    }
    if cli.offline {
        config.remote.enabled = false;
    }
    Ok(config)
}

fn build_reconciler(config: &Config) -> Result<Reconciler> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.store.db_path)?;
    info!(path = %config.store.db_path.display(), "Database opened");

    let remote: Box<dyn RemoteTaskSource> = if config.remote.enabled {
        let source = HttpTaskSource::new(&config.remote.url, config.remote.timeout())?;
        debug!(url = source.url(), "Remote task source");
        Box::new(source)
    } else {
        Box::new(DisabledSource)
    };

    Ok(TaskReconciler::new(db, remote).with_options(config.reconciler_options()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(format: OutputFormat, task: &TaskRecord) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(task),
        OutputFormat::Markdown => {
            print!("{}", format_task_markdown(task));
            Ok(())
        }
    }
}

/// Tell the user about a reconciler error. Returns the process exit code.
fn report_error(format: OutputFormat, err: &ReconcileError) -> Result<ExitCode> {
    match format {
        OutputFormat::Json => print_json(&err.to_body())?,
        OutputFormat::Markdown => eprintln!("error: {err}"),
    }
    Ok(ExitCode::FAILURE)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(format) = OutputFormat::from_str(&cli.format) else {
        bail!("unknown output format: {}", cli.format);
    };
    let config = load_config(&cli)?;
    let mut reconciler = build_reconciler(&config)?;

    match cli.command.unwrap_or(Command::List { query: None }) {
        Command::List { query } => {
            // A failed remote still leaves a usable (empty) list.
            let outcome = match reconciler.load_initial_tasks().await {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    eprintln!("warning: {err}");
                    None
                }
            };
            let tasks = reconciler.filter(query.as_deref().unwrap_or(""));
            match (format, outcome) {
                (OutputFormat::Json, _) => print_json(&tasks)?,
                (OutputFormat::Markdown, Some(outcome)) => {
                    print!("{}", format_load_markdown(&outcome, &tasks))
                }
                (OutputFormat::Markdown, None) => print!("{}", format_tasks_markdown(&tasks)),
            }
        }
        Command::Reload => match reconciler.reload().await {
            Ok(outcome) => match format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Markdown => print!("{}", format_load_markdown(&outcome, &outcome.tasks)),
            },
            Err(err) => return report_error(format, &err),
        },
        Command::Show { id } => match reconciler.store().get(id) {
            Some(task) => print_task(format, &task)?,
            None => return report_error(format, &ReconcileError::NotFound(id)),
        },
        Command::Add { title, description } => {
            match reconciler.create_task(&title, &description) {
                Ok(task) => print_task(format, &task)?,
                Err(err) => return report_error(format, &err),
            }
        }
        Command::Edit {
            id,
            title,
            description,
            completed,
        } => {
            let Some(mut task) = reconciler.store().get(id) else {
                return report_error(format, &ReconcileError::NotFound(id));
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(completed) = completed {
                task.completed = completed;
            }
            match reconciler.update_task(&task) {
                Ok(task) => print_task(format, &task)?,
                Err(err) => return report_error(format, &err),
            }
        }
        Command::Toggle { id } => match reconciler.toggle_completion(id) {
            Ok(task) => print_task(format, &task)?,
            Err(err) => return report_error(format, &err),
        },
        Command::Delete { id } => {
            let Some(task) = reconciler.store().get(id) else {
                return report_error(format, &ReconcileError::NotFound(id));
            };
            match reconciler.delete_task(&task) {
                Ok(()) => match format {
                    OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id }))?,
                    OutputFormat::Markdown => println!("Deleted task `{id}`."),
                },
                Err(err) => return report_error(format, &err),
            }
        }
        Command::Sync => match reconciler.sync_with_remote().await {
            Ok(report) => match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Markdown => print!("{}", format_sync_markdown(&report)),
            },
            Err(err) => return report_error(format, &err),
        },
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;
    run(cli).await
}
