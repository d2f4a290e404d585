/*!
 * Error types for CHADTree
 */

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChadError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

/// Failure of a single "open in system file manager" attempt
#[derive(Error, Debug)]
pub enum OpenError {
    /// None of `open`, `xdg-open`, `start` is on the search path.
    /// `message` is the localized text for `key`.
    #[error("{message}")]
    OpenerNotFound { key: &'static str, message: String },

    /// The opener ran but exited non-zero
    #[error("{} exited with {}: {}", .program.display(), exit_label(.code), .stderr.trim())]
    LaunchFailed {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// Anything else: spawn failures, bad cwd, permissions
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl OpenError {
    /// Whether this failure is meant for the user's eyes.
    ///
    /// Only resolution failures and non-zero exits are; everything else goes
    /// to the diagnostic log.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            OpenError::OpenerNotFound { .. } | OpenError::LaunchFailed { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            OpenError::OpenerNotFound { .. } => ErrorCategory::Resolution,
            OpenError::LaunchFailed { .. } => ErrorCategory::Launch,
            OpenError::Io(_) => ErrorCategory::IoError,
        }
    }
}

/// Top level error for the library and the `chadtree` binary
#[derive(Error, Debug)]
pub enum ChadError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("Host error: {0}")]
    Host(#[from] chadtree_host::HostError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ChadError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ChadError::Config(_) | ChadError::Pool(_) => EXIT_FATAL,
            _ => EXIT_FAILURE,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ChadError::Open(e) => e.category(),
            ChadError::Host(_) => ErrorCategory::Host,
            ChadError::Config(_) => ErrorCategory::Configuration,
            ChadError::Pool(_) => ErrorCategory::Concurrency,
            ChadError::Io(_) => ErrorCategory::IoError,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No system opener found
    Resolution,
    /// Opener exited non-zero
    Launch,
    /// I/O operation errors
    IoError,
    /// Editor state could not be read
    Host,
    /// Configuration errors
    Configuration,
    /// Worker pool errors
    Concurrency,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Resolution => write!(f, "resolution"),
            ErrorCategory::Launch => write!(f, "launch"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Host => write!(f, "host"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Concurrency => write!(f, "concurrency"),
        }
    }
}
