//! Error types and process exit statuses.

use std::io;

/// Errors raised by the document engine and its collaborators.
///
/// [`Error::NotFound`] is the only soft failure: the caller keeps running and
/// shows the message. Everything else is fatal for the current action.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested page, section or listing produced no content.
    #[error("{0}")]
    NotFound(String),
    /// A collaborator returned output that violates its contract.
    #[error("malformed output from {tool}: {detail}")]
    Malformed { tool: &'static str, detail: String },
    /// A child process crashed or exited abnormally.
    #[error("{tool} failed: {detail}")]
    Child { tool: String, detail: String },
    /// Invalid configuration file contents.
    #[error("configuration error: {0}")]
    Config(String),
    /// Reading a page or configuration file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error is a soft "nothing to show" condition.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Classify the error for process teardown.
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::NotFound(_) => ExitStatus::NotFound,
            Self::Malformed { .. } | Self::Io(_) => ExitStatus::OperError,
            Self::Child { .. } => ExitStatus::ChildError,
            Self::Config(_) => ExitStatus::ConfigError,
        }
    }
}

/// Exit statuses, numbered as `man` numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    UsageError,
    OperError,
    ChildError,
    ConfigError,
    NotFound,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::UsageError => 1,
            Self::OperError => 2,
            Self::ChildError => 3,
            Self::ConfigError => 4,
            Self::NotFound => 16,
        }
    }
}
