//! Error types shared by every kenbot-action crate.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kenbot-action operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kenbot-action operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Required configuration is missing or malformed.
    #[error("{message}")]
    #[diagnostic(code(kenbot_action::config))]
    InvalidConfiguration {
        /// The error message, naming the offending variable or input.
        message: String,
        /// Optional help text.
        #[help]
        help: Option<String>,
    },

    /// The workflow was triggered by an event Kenbot has no command for.
    #[error("{event} event is not supported by Kenbot")]
    #[diagnostic(
        code(kenbot_action::unsupported_event),
        help(
            "Trigger the workflow on pull_request, pull_request_target, push, schedule or workflow_dispatch"
        )
    )]
    UnsupportedEvent {
        /// The triggering event name.
        event: String,
    },

    /// The Kenbot process finished with a non-zero exit code.
    #[error("Kenbot exited with exit code {code}")]
    #[diagnostic(code(kenbot_action::tool_execution))]
    ToolExecution {
        /// The exit code, or -1 if the process was terminated by a signal.
        code: i32,
    },

    /// The current branch of the checkout could not be determined.
    #[error("Error getting current branch from the .git folder: {message}")]
    #[diagnostic(
        code(kenbot_action::branch_lookup),
        help("Set KS_GIT_BASE_BRANCH or make sure the repository is checked out")
    )]
    BranchLookup {
        /// Description of the underlying failure.
        message: String,
    },

    /// Downloading the Kenbot executable failed.
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(code(kenbot_action::download))]
    Download {
        /// The requested URL.
        url: String,
        /// Transport or HTTP status description.
        message: String,
    },

    /// A file system or process spawn operation failed.
    #[error("I/O {operation} failed{}: {source}", on_path(.path))]
    #[diagnostic(code(kenbot_action::io))]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// The path involved, when there is one.
        path: Option<PathBuf>,
        /// Short description of what was attempted.
        operation: String,
    },
}

impl Error {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            help: None,
        }
    }

    /// Create an invalid configuration error with help text.
    #[must_use]
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an unsupported event error.
    #[must_use]
    pub fn unsupported_event(event: impl Into<String>) -> Self {
        Self::UnsupportedEvent {
            event: event.into(),
        }
    }

    /// Create a branch lookup error wrapping the underlying cause.
    #[must_use]
    pub fn branch_lookup(cause: impl std::fmt::Display) -> Self {
        Self::BranchLookup {
            message: cause.to_string(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the operation and path it came from.
    #[must_use]
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Io {
            source,
            path,
            operation: operation.into(),
        }
    }
}

fn on_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or(String::new(), |p| format!(" on {}", p.display()))
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "operation".to_string(),
        }
    }
}
