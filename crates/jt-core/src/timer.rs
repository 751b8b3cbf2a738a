//! Single-session timer.
//!
//! The timer is either idle or running against exactly one issue. Starting a
//! new session while one is running replaces it; the replaced session is
//! handed back so callers can keep it if they want, but the timer itself
//! forgets it.
//!
//! Every transition has an `_at` variant that takes the current time
//! explicitly. The plain variants read [`Utc::now`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issue::Issue;

/// An in-flight timing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub issue: Issue,
    pub started_at: DateTime<Utc>,
}

impl TimerSession {
    /// Time elapsed between the session start and `now`, never negative.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.started_at, now)
    }
}

/// The outcome of stopping a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLogResult {
    pub issue: Issue,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl TimeLogResult {
    /// Whole seconds tracked, rounded down.
    pub const fn duration_seconds(&self) -> u64 {
        self.duration.as_secs()
    }
}

/// Timer states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running(TimerSession),
}

/// Owner of the single current session.
#[derive(Debug, Default)]
pub struct Timer {
    state: TimerState,
}

impl Timer {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &TimerState {
        &self.state
    }

    pub const fn session(&self) -> Option<&TimerSession> {
        match &self.state {
            TimerState::Idle => None,
            TimerState::Running(session) => Some(session),
        }
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }

    /// Starts timing `issue` now. See [`Timer::start_at`].
    pub fn start(&mut self, issue: Issue) -> Option<TimerSession> {
        self.start_at(issue, Utc::now())
    }

    /// Starts timing `issue` from `started_at`.
    ///
    /// Returns the session that was running before, if any. Its elapsed time
    /// is not recorded anywhere else.
    pub fn start_at(&mut self, issue: Issue, started_at: DateTime<Utc>) -> Option<TimerSession> {
        let next = TimerState::Running(TimerSession { issue, started_at });
        match std::mem::replace(&mut self.state, next) {
            TimerState::Idle => None,
            TimerState::Running(previous) => {
                tracing::debug!(
                    issue = %previous.issue.key,
                    started_at = %previous.started_at,
                    "replacing running timer"
                );
                Some(previous)
            }
        }
    }

    /// Stops the timer now. See [`Timer::stop_at`].
    pub fn stop(&mut self) -> Option<TimeLogResult> {
        self.stop_at(Utc::now())
    }

    /// Stops the running session and returns what it tracked.
    ///
    /// Returns `None` and stays idle if nothing was running.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Option<TimeLogResult> {
        match std::mem::take(&mut self.state) {
            TimerState::Idle => None,
            TimerState::Running(session) => {
                let duration = session.elapsed_at(now);
                Some(TimeLogResult {
                    issue: session.issue,
                    started_at: session.started_at,
                    duration,
                })
            }
        }
    }

    /// Elapsed time of the running session, zero when idle.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now())
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        self.session()
            .map_or(Duration::ZERO, |session| session.elapsed_at(now))
    }
}

fn elapsed_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    // Negative when the wall clock moved backwards.
    (end - start).to_std().unwrap_or(Duration::ZERO)
}

/// Formats an elapsed duration for display: `mm:ss` under an hour, `hh:mm:ss` otherwise.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
