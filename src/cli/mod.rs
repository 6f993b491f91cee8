//! CLI command definitions for todo-sync.
//!
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Parser, Subcommand};

/// Local to-do list backed by SQLite, seeded from a remote task list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Remote task list URL (overrides config)
    #[arg(long, global = true)]
    pub remote_url: Option<String>,

    /// Never contact the remote
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format: markdown or json
    #[arg(short, long, default_value = "markdown", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load tasks (importing from the remote if the store is empty) and list them (default)
    List {
        /// Only show tasks whose title contains this text (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Re-run the load policy and list the tasks
    Reload,

    /// Show one task
    Show { id: i64 },

    /// Create a task
    Add {
        title: String,

        #[arg(short = 'D', long, default_value = "")]
        description: String,
    },

    /// Edit a task's title, description or completion flag
    Edit {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'D', long)]
        description: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a task between open and done
    Toggle { id: i64 },

    /// Delete a task
    Delete { id: i64 },

    /// Add remote tasks that are not stored locally yet
    Sync,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_description() {
        let cli = Cli::parse_from(["todo-sync", "add", "Buy milk", "-D", "2 litres"]);
        match cli.command {
            Some(Command::Add { title, description }) => {
                assert_eq!(title, "Buy milk");
                assert_eq!(description, "2 litres");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log, "2");
        assert_eq!(cli.format, "markdown");
    }

    #[test]
    fn test_parse_edit_and_globals() {
        let cli = Cli::parse_from([
            "todo-sync",
            "edit",
            "4",
            "--completed",
            "true",
            "--database",
            "x.db",
            "--offline",
        ]);
        assert_eq!(cli.database.as_deref(), Some("x.db"));
        assert!(cli.offline);
        match cli.command {
            Some(Command::Edit {
                id,
                title,
                completed,
                ..
            }) => {
                assert_eq!(id, 4);
                assert!(title.is_none());
                assert_eq!(completed, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["todo-sync", "-v"]);
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
