//! Writes settings to the config file and the token to the keychain.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use jt_jira::normalize_domain;

use crate::Config;
use crate::credentials::SecretStore;

/// Values given on the command line; `None` leaves a setting alone.
#[derive(Debug, Default)]
pub struct Changes {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub default_query: Option<String>,
    pub token: Option<String>,
}

impl Changes {
    const fn is_empty(&self) -> bool {
        self.domain.is_none()
            && self.email.is_none()
            && self.default_query.is_none()
            && self.token.is_none()
    }
}

/// Empty strings clear a setting.
fn cleared(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

pub fn run<W: Write>(
    writer: &mut W,
    path: &Path,
    store: &dyn SecretStore,
    changes: Changes,
) -> Result<()> {
    if changes.is_empty() {
        writeln!(
            writer,
            "Nothing to change. Pass --domain, --email, --default-query or --token."
        )?;
        return Ok(());
    }

    let token = changes
        .token
        .map(|token| cleared(token).context("API token cannot be empty"))
        .transpose()?;
    let mut config = Config::load_file(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if let Some(domain) = changes.domain {
        let domain = cleared(domain).context("Site cannot be empty")?;
        let base_url =
            normalize_domain(&domain).with_context(|| format!("invalid site '{domain}'"))?;
        config.domain = Some(base_url);
    }
    if let Some(email) = changes.email {
        config.email = cleared(email);
    }
    if let Some(query) = changes.default_query {
        config.default_query = cleared(query);
    }

    // Nothing is written unless every change is valid and the token is stored.
    if let Some(token) = &token {
        store.save_secret(token)?;
    }
    config.save_to(path)?;
    writeln!(writer, "Saved configuration to {}", path.display())?;
    if token.is_some() {
        writeln!(writer, "Stored API token in keychain")?;
    }
    Ok(())
}

/// Forgets the stored token.
pub fn logout<W: Write>(writer: &mut W, store: &dyn SecretStore) -> Result<()> {
    store.delete_secret()?;
    writeln!(writer, "Removed stored API token")?;
    Ok(())
}
