//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The issue key does not look like `PROJECT-123`.
    #[error("invalid issue key: {value}")]
    InvalidIssueKey { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
///
/// With a field name the macro also generates a `new` that only rejects
/// empty values; without one the type supplies its own `new`.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        define_string_id!($(#[$meta])* $name);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_string_id!(
    /// A human-readable issue key such as `PROJ-123`.
    ///
    /// Keys are a project prefix, a dash, and a positive number. Keys are
    /// upper-cased on construction so `proj-1` and `PROJ-1` compare equal.
    IssueKey
);

impl IssueKey {
    /// Creates a key after validation.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "issue key" });
        }
        let Some((project, number)) = trimmed.rsplit_once('-') else {
            return Err(ValidationError::InvalidIssueKey { value: key });
        };
        let project_ok = !project.is_empty()
            && project
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        let number_ok = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
        if !project_ok || !number_ok {
            return Err(ValidationError::InvalidIssueKey { value: key });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

define_string_id!(
    /// A remote account identifier.
    ///
    /// Account IDs are opaque non-empty strings assigned by the ticket service.
    AccountId, "account ID"
);
