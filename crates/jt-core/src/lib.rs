//! Core domain logic for the jt work-log tracker.
//!
//! This crate contains:
//! - Issue, user and work-log records built from ticket service responses
//! - The single-session timer state machine
//! - Validated identifiers for issue keys and accounts

pub mod issue;
pub mod timer;
pub mod types;

pub use issue::{Comment, CommentAuthor, Issue, User, WorkLogEntry};
pub use timer::{TimeLogResult, Timer, TimerSession, TimerState, format_elapsed};
pub use types::{AccountId, IssueKey, ValidationError};
