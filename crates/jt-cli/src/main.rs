use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jt_core::IssueKey;
use jt_cli::commands::{
    comment, configure, connect, history, issues, log, status, track, whoami,
};
use jt_cli::credentials::{KeyringStore, load_secret};
use jt_cli::{Cli, Commands, Config, default_config_file};

/// The file `configure` edits: `--config` if given, else the default location.
fn config_file(cli: &Cli) -> Result<PathBuf> {
    cli.config
        .clone()
        .or_else(default_config_file)
        .context("could not determine config directory; pass --config <file>")
}

fn parse_key(key: &str) -> Result<IssueKey> {
    IssueKey::new(key).with_context(|| format!("'{key}' is not an issue key like PROJ-123"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = cli.command.as_ref() else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let store = KeyringStore::new();
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Configure {
            domain,
            email,
            default_query,
            token,
        } => {
            let changes = configure::Changes {
                domain: domain.clone(),
                email: email.clone(),
                default_query: default_query.clone(),
                token: token.clone(),
            };
            configure::run(&mut stdout, &config_file(&cli)?, &store, changes)?;
        }
        Commands::Logout => configure::logout(&mut stdout, &store)?,
        Commands::Status => {
            let has_token = load_secret(&store).is_some();
            let path = cli.config.clone().or_else(default_config_file);
            status::run(&mut stdout, &config, path.as_deref(), has_token)?;
        }
        Commands::Whoami => {
            let client = connect(&config, &store)?;
            whoami::run(&mut stdout, &client).await?;
        }
        Commands::Issues { jql, json } => {
            let client = connect(&config, &store)?;
            issues::run(
                &mut stdout,
                &client,
                jql.as_deref(),
                config.default_query.as_deref(),
                *json,
            )
            .await?;
        }
        Commands::Track {
            key,
            message,
            comment,
        } => {
            let key = parse_key(key)?;
            let client = connect(&config, &store)?;
            track::run(&mut stdout, &client, &key, message.clone(), *comment).await?;
        }
        Commands::Log {
            key,
            duration,
            started,
            message,
            comment,
        } => {
            let key = parse_key(key)?;
            let client = connect(&config, &store)?;
            log::run(
                &mut stdout,
                &client,
                key,
                duration,
                started.as_deref(),
                message.clone(),
                *comment,
            )
            .await?;
        }
        Commands::Comment { key, text } => {
            let key = parse_key(key)?;
            let client = connect(&config, &store)?;
            comment::run(&mut stdout, &client, &key, text).await?;
        }
        Commands::History { limit, json } => {
            let client = connect(&config, &store)?;
            history::run(&mut stdout, &client, *limit, *json).await?;
        }
    }

    stdout.flush()?;
    Ok(())
}
