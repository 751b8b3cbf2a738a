//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use jt_jira::{Connection, Credentials};

/// Application configuration.
///
/// The API token is not part of it; it lives in the credential store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Site as entered: a short name, a host name or a full URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Account e-mail used for Basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Query tried before the built-in defaults when listing issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_query: Option<String>,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(path) = default_config_file() {
            figment = figment.merge(Toml::file(path));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (JT_*)
        figment = figment.merge(Env::prefixed("JT_"));

        figment.extract()
    }

    /// Loads a single file without defaults or environment overrides.
    ///
    /// Used when editing, so overrides are not written back to disk.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_file(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Builds the connection the client runs on.
    ///
    /// Missing e-mail or token is not an error here; the client reports it
    /// as not signed in on first use.
    pub fn connection(&self, secret: Option<&str>) -> Result<Connection> {
        let domain = self
            .domain
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .context("No site configured. Run 'jt configure --domain <site>' first.")?;
        let credentials = match (self.email.as_deref(), secret) {
            (Some(email), Some(secret)) => Credentials::new(email, secret),
            _ => None,
        };
        Connection::new(domain, credentials)
            .with_context(|| format!("invalid site '{domain}'"))
    }
}

/// Returns the platform-specific config directory for jt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("jt"))
}

/// Returns the default config file path.
///
/// On Linux: `~/.config/jt/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_ends_with_config_toml() {
        let path = default_config_file().unwrap();
        assert_eq!(path.file_name().unwrap(), "config.toml");
        assert_eq!(path.parent().unwrap().file_name().unwrap(), "jt");
    }

    #[test]
    fn test_save_then_load_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            domain: Some("acme".to_string()),
            email: Some("ada@example.com".to_string()),
            default_query: Some("project = PROJ".to_string()),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_file_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unset_fields_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config {
            domain: Some("acme".to_string()),
            ..Config::default()
        }
        .save_to(&path)
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), r#"domain = "acme""#);
    }

    #[test]
    fn test_connection_requires_domain() {
        let err = Config::default().connection(Some("token")).unwrap_err();
        assert!(err.to_string().contains("No site configured"));
    }

    #[test]
    fn test_connection_without_secret_has_no_credentials() {
        let config = Config {
            domain: Some("acme".to_string()),
            email: Some("ada@example.com".to_string()),
            default_query: None,
        };
        let connection = config.connection(None).unwrap();
        assert_eq!(connection.base_url(), "https://acme.atlassian.net");
        assert!(connection.credentials().is_none());

        let connection = config.connection(Some("token")).unwrap();
        assert_eq!(
            connection.credentials().map(Credentials::email),
            Some("ada@example.com")
        );
    }

    #[test]
    fn test_connection_rejects_bad_domain() {
        let config = Config {
            domain: Some("bad name".to_string()),
            ..Config::default()
        };
        assert!(config.connection(None).is_err());
    }
}
