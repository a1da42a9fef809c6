//! # Error Handling
//!
//! This module defines the centralized error type for `rotate-symlink`. It uses
//! the `thiserror` library to build an `Error` enum covering every way a
//! rotation can fail, with enough context in each variant to act on the
//! message without re-running the command.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries the paths and values
//!   involved in the failure.
//!
//! - **`ErrorKind`**: A coarse classification of `Error` values into the four
//!   failure families callers care about: invalid input, a target missing from
//!   the candidate set, an out-of-range step, and filesystem failures.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error aborts the operation that produced it. Partial pruning failures
//! are the one exception and are reported inside the rotation result instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rotate-symlink operations
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied arguments that can never succeed.
    ///
    /// Includes an optional hint about how to fix the input.
    #[error("Invalid input: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    InvalidInput {
        message: String,
        /// Optional hint for how to fix the input
        hint: Option<String>,
    },

    /// The link's resolved target is not part of the computed candidate set.
    #[error("Current target {} is not a rotation candidate under {}", target.display(), root.display())]
    NotFound { target: PathBuf, root: PathBuf },

    /// The strict range policy rejected the computed index.
    #[error("Unable to move {direction}, invalid target. Index: {index} Current: ({current}) List: ({candidates})")]
    OutOfRange {
        direction: &'static str,
        index: i64,
        current: String,
        candidates: String,
    },

    /// A filesystem operation failed at the OS level.
    #[error("Filesystem operation error: {operation} {}: {source}", path.display())]
    Filesystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The old link was removed but the new one could not be created.
    ///
    /// The link is absent on disk after this error. It is not retried.
    #[error("Link {} was removed but could not be recreated to point at {}: {source}\n  hint: recreate it manually with `ln -s {} {}`", link.display(), target.display(), target.display(), link.display())]
    LinkLost {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rotation job file is well-formed YAML but describes no usable job.
    #[error("Configuration parsing error: {message}")]
    ConfigParse { message: String },

    /// A job file is not valid YAML or does not match the job schema.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory listing error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    OutOfRange,
    FilesystemFailure,
}

impl ErrorKind {
    /// Stable snake_case name, used in JSON failure reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::FilesystemFailure => "filesystem_failure",
        }
    }
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] without a hint.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. } | Error::ConfigParse { .. } | Error::Yaml(_) => {
                ErrorKind::InvalidInput
            }
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::Filesystem { .. } | Error::LinkLost { .. } | Error::Walk(_) => {
                ErrorKind::FilesystemFailure
            }
        }
    }

    /// Whether the tree was left in a state that needs manual repair.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::LinkLost { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
