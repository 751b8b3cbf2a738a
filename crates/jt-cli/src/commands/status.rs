//! Status command for showing the current configuration.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use jt_jira::normalize_domain;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    config_path: Option<&Path>,
    has_token: bool,
) -> Result<()> {
    writeln!(writer, "jt status")?;
    match config_path {
        Some(path) => writeln!(writer, "Config: {}", path.display())?,
        None => writeln!(writer, "Config: (no config directory)")?,
    }

    let site = match config.domain.as_deref() {
        None => "not configured".to_string(),
        Some(domain) => {
            normalize_domain(domain).unwrap_or_else(|_| format!("{domain} (invalid)"))
        }
    };
    writeln!(writer, "Site: {site}")?;
    writeln!(
        writer,
        "E-mail: {}",
        config.email.as_deref().unwrap_or("not configured")
    )?;
    writeln!(
        writer,
        "Default query: {}",
        config.default_query.as_deref().unwrap_or("(built-in)")
    )?;
    writeln!(
        writer,
        "API token: {}",
        if has_token { "available" } else { "not set" }
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn render(config: &Config, has_token: bool) -> String {
        let mut output = Vec::new();
        run(
            &mut output,
            config,
            Some(Path::new("/home/ada/.config/jt/config.toml")),
            has_token,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn status_for_empty_config() {
        assert_snapshot!(render(&Config::default(), false), @r"
        jt status
        Config: /home/ada/.config/jt/config.toml
        Site: not configured
        E-mail: not configured
        Default query: (built-in)
        API token: not set
        ");
    }

    #[test]
    fn status_shows_normalized_site() {
        let config = Config {
            domain: Some("acme".to_string()),
            email: Some("ada@example.com".to_string()),
            default_query: Some("project = PROJ".to_string()),
        };
        assert_snapshot!(render(&config, true), @r"
        jt status
        Config: /home/ada/.config/jt/config.toml
        Site: https://acme.atlassian.net
        E-mail: ada@example.com
        Default query: project = PROJ
        API token: available
        ");
    }

    #[test]
    fn status_flags_invalid_site() {
        let config = Config {
            domain: Some("bad name".to_string()),
            ..Config::default()
        };
        assert!(render(&config, false).contains("Site: bad name (invalid)"));
    }
}
