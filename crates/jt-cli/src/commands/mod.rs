//! CLI subcommand implementations.

pub mod comment;
pub mod configure;
pub mod history;
pub mod issues;
pub mod log;
pub mod status;
pub mod track;
pub mod util;
pub mod whoami;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::{Context, Result};

use jt_jira::JiraClient;

use crate::Config;
use crate::credentials::{SecretStore, load_secret};

/// Builds a client from the loaded configuration and stored token.
pub fn connect(config: &Config, store: &dyn SecretStore) -> Result<JiraClient> {
    let secret = load_secret(store);
    let connection = config.connection(secret.as_deref())?;
    tracing::debug!(?connection, "connecting");
    JiraClient::new(connection).context("failed to set up HTTP client")
}
