//! Shared utilities for CLI commands.

use std::sync::LazyLock;
use std::time::Duration as StdDuration;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use jt_jira::JiraError;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Pre-compiled regex for `1h30m15s`-style durations.
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Longest duration accepted for a single work log.
const MAX_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(Utc::now() - duration)
}

/// Parse a work duration.
///
/// Supports `1h30m`, `45m`, `90s`, `2h 15m`, or a bare number of minutes.
pub fn parse_duration(s: &str) -> anyhow::Result<StdDuration> {
    let s = s.trim().to_ascii_lowercase();
    if s.is_empty() {
        anyhow::bail!("Duration cannot be empty");
    }

    let secs = if let Ok(minutes) = s.parse::<u64>() {
        minutes.saturating_mul(60)
    } else {
        let Some(caps) = DURATION_RE.captures(&s) else {
            anyhow::bail!("Invalid duration: {s}. Use e.g. 1h30m, 45m, 90s or a number of minutes");
        };
        let part = |index: usize, scale: u64| -> anyhow::Result<u64> {
            caps.get(index).map_or(Ok(0), |m| {
                m.as_str()
                    .parse::<u64>()
                    .map(|n| n.saturating_mul(scale))
                    .context("failed to parse number in duration")
            })
        };
        part(1, 3600)?
            .saturating_add(part(2, 60)?)
            .saturating_add(part(3, 1)?)
    };

    if secs == 0 {
        anyhow::bail!("Duration must be greater than zero");
    }
    if secs > MAX_DURATION_SECS {
        anyhow::bail!("Duration too large: {s}");
    }
    Ok(StdDuration::from_secs(secs))
}

/// Renders seconds in the form [`parse_duration`] accepts, e.g. `1h5m30s`.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

/// Wraps a client error, pointing at `jt configure` when settings are at fault.
pub fn explain(error: JiraError) -> anyhow::Error {
    if error.requires_reconfiguration() {
        anyhow::Error::new(error)
            .context("Check your site, e-mail and API token with 'jt configure'")
    } else {
        anyhow::Error::new(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_accepts_rfc3339() {
        let dt = parse_datetime("2026-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-15T10:30:00+00:00");
    }

    #[test]
    fn parse_datetime_accepts_relative() {
        let dt = parse_datetime("2 hours ago").unwrap();
        let expected = Utc::now() - Duration::hours(2);
        assert!((dt - expected).num_seconds().abs() < 5);
        assert!(parse_datetime("1 week ago").is_ok());
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert!(parse_datetime("tomorrow").is_err());
        assert!(parse_datetime("999999999999 weeks ago").is_err());
    }

    #[test]
    fn parse_duration_accepts_unit_forms() {
        assert_eq!(parse_duration("1h30m").unwrap().as_secs(), 5400);
        assert_eq!(parse_duration("45m").unwrap().as_secs(), 2700);
        assert_eq!(parse_duration("90s").unwrap().as_secs(), 90);
        assert_eq!(parse_duration("2h 15m").unwrap().as_secs(), 8100);
        assert_eq!(parse_duration("1H5M30S").unwrap().as_secs(), 3930);
    }

    #[test]
    fn parse_duration_treats_bare_numbers_as_minutes() {
        assert_eq!(parse_duration("25").unwrap().as_secs(), 1500);
    }

    #[test]
    fn parse_duration_rejects_bad_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0m").is_err());
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("1x").is_err());
        assert!(parse_duration("200h").is_err());
    }

    #[test]
    fn format_duration_round_trips_through_parse() {
        for secs in [1, 59, 60, 61, 3600, 3930, 86_399] {
            let rendered = format_duration(secs);
            assert_eq!(parse_duration(&rendered).unwrap().as_secs(), secs, "{rendered}");
        }
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(3930), "1h5m30s");
    }

    #[test]
    fn explain_adds_hint_for_auth_errors() {
        let err = explain(JiraError::Unauthorized);
        assert!(err.to_string().contains("jt configure"));
        assert!(format!("{err:#}").contains("authentication failed"));

        let err = explain(JiraError::Timeout);
        assert_eq!(err.to_string(), "request timed out");
    }
}
