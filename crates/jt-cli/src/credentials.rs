//! API token storage.
//!
//! The token is kept in the OS keychain under a fixed service/account pair.
//! `JT_API_TOKEN` is consulted when the keychain has nothing.

use anyhow::{Context, Result};

const DEFAULT_KEYRING_SERVICE: &str = "jt";
const KEYRING_ACCOUNT: &str = "api-token";
const TOKEN_ENV: &str = "JT_API_TOKEN";

/// Place where the API token is kept.
pub trait SecretStore {
    fn save_secret(&self, secret: &str) -> Result<()>;
    fn get_secret(&self) -> Result<Option<String>>;
    fn delete_secret(&self) -> Result<()>;
}

/// OS keychain store.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Uses the `jt` service, or `JT_KEYRING_SERVICE` when set so tests can
    /// stay away from real credentials.
    pub fn new() -> Self {
        let service = std::env::var("JT_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        Self { service }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, KEYRING_ACCOUNT).context("keychain is unavailable")
    }
}

impl SecretStore for KeyringStore {
    fn save_secret(&self, secret: &str) -> Result<()> {
        self.entry()?
            .set_password(secret)
            .context("failed to store API token in keychain")
    }

    fn get_secret(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err).context("failed to read API token from keychain"),
        }
    }

    fn delete_secret(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err).context("failed to delete API token from keychain"),
        }
    }
}

/// Loads the token: keychain first, then `JT_API_TOKEN`.
pub fn load_secret(store: &dyn SecretStore) -> Option<String> {
    lookup_secret(store, std::env::var(TOKEN_ENV).ok())
}

/// A keychain error counts as an empty keychain.
fn lookup_secret(store: &dyn SecretStore, from_env: Option<String>) -> Option<String> {
    let stored = match store.get_secret() {
        Ok(secret) => secret,
        Err(error) => {
            tracing::debug!(%error, "keychain lookup failed");
            None
        }
    };
    stored
        .filter(|s| !s.trim().is_empty())
        .or_else(|| from_env.filter(|s| !s.trim().is_empty()))
}
