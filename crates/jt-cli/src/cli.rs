//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ticket time tracker.
///
/// Times work against issues on a hosted ticket service and submits the
/// result as work logs.
#[derive(Debug, Parser)]
#[command(name = "jt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save site, e-mail and API token.
    Configure {
        /// Site name (`acme`), host name or full URL.
        #[arg(long)]
        domain: Option<String>,

        /// Account e-mail.
        #[arg(long)]
        email: Option<String>,

        /// Query tried first when listing issues. Pass an empty string to clear.
        #[arg(long)]
        default_query: Option<String>,

        /// API token, stored in the OS keychain.
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove the stored API token.
    Logout,

    /// Show current configuration.
    Status,

    /// Show the signed-in user.
    Whoami,

    /// List issues assigned to you.
    Issues {
        /// Run this query instead of the defaults.
        #[arg(long)]
        jql: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Time work on an issue until Ctrl-C, then log it.
    Track {
        /// Issue key, e.g. PROJ-123.
        key: String,

        /// Work log description.
        #[arg(short, long)]
        message: Option<String>,

        /// Also post the description as a comment.
        #[arg(long)]
        comment: bool,
    },

    /// Log work on an issue directly.
    Log {
        /// Issue key, e.g. PROJ-123.
        key: String,

        /// Time spent (e.g., "1h30m", "45m", "90s", or minutes).
        #[arg(short, long)]
        duration: String,

        /// When the work started (ISO 8601 or relative, e.g. "2 hours ago").
        /// Defaults to the duration before now.
        #[arg(long)]
        started: Option<String>,

        /// Work log description.
        #[arg(short, long)]
        message: Option<String>,

        /// Also post the description as a comment.
        #[arg(long)]
        comment: bool,
    },

    /// Add a comment to an issue.
    Comment {
        /// Issue key, e.g. PROJ-123.
        key: String,

        /// Comment text.
        text: String,
    },

    /// Show your recent work logs.
    History {
        /// Maximum number of entries.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_log_arguments() {
        let cli = Cli::parse_from([
            "jt", "log", "PROJ-7", "--duration", "1h30m", "--started", "2 hours ago", "-m",
            "review", "--comment",
        ]);
        let Some(Commands::Log {
            key,
            duration,
            started,
            message,
            comment,
        }) = cli.command
        else {
            panic!("expected log command");
        };
        assert_eq!(key, "PROJ-7");
        assert_eq!(duration, "1h30m");
        assert_eq!(started.as_deref(), Some("2 hours ago"));
        assert_eq!(message.as_deref(), Some("review"));
        assert!(comment);
    }

    #[test]
    fn history_limit_defaults_to_fifty() {
        let cli = Cli::parse_from(["jt", "history"]);
        assert!(matches!(
            cli.command,
            Some(Commands::History {
                limit: 50,
                json: false
            })
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["jt", "whoami", "-v", "--config", "/tmp/jt.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/jt.toml")));
    }
}
