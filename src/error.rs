//! Error types for driving the XPDF binaries

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for xpdf operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user input (missing file, bad mode, non-positive page quantity)
    #[error("{0}")]
    InvalidArgument(String),

    /// None of the candidate executables could be resolved
    #[error("Executable {name} not found (tried: {})", display_candidates(.candidates))]
    ExecutableNotFound {
        /// Tool name
        name: String,
        /// Candidates that were tried
        candidates: Vec<PathBuf>,
    },

    /// A tool factory could not find its binary
    #[error("Unable to find {binary}")]
    BinaryNotFound {
        /// Tool name
        binary: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// The child process could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child process ran past its timeout and was killed
    #[error("Command `{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// The child process exited with a non-zero status
    #[error("Command `{command}` failed with {}: {stderr}", display_code(.code))]
    ExecutionFailure {
        command: String,
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        stderr: String,
    },

    /// Tool-level failure wrapping a process error
    #[error("{message}")]
    Runtime {
        message: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Extracted text is not valid UTF-8 for the requested charset
    #[error("Output in charset {charset} is not valid UTF-8, read it as bytes instead")]
    Decode {
        charset: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No platform configuration directory is available
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Wrap a lower-level error as a tool runtime failure
    pub(crate) fn runtime(message: &'static str, source: Error) -> Self {
        Error::Runtime {
            message,
            source: Box::new(source),
        }
    }

    /// Build the "is not a valid file" error used by every tool
    pub(crate) fn invalid_file(path: &std::path::Path) -> Self {
        Error::InvalidArgument(format!("{} is not a valid file", path.display()))
    }
}

fn display_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|c| c.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

/// Result type alias for xpdf operations
pub type Result<T> = std::result::Result<T, Error>;
