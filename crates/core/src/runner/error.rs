//! Error types for process launching.

use thiserror::Error;

/// Reasons a process request could not be started.
///
/// These never propagate to callers of [`run`](super::run): the runner
/// writes them to its output and completes the request immediately.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The executable is neither an existing absolute path nor found on the
    /// corrected search path.
    #[error("executable '{0}' not found")]
    ExecutableNotFound(String),

    /// The working directory does not exist.
    #[error("working directory {0:?} does not exist")]
    MissingWorkingDir(std::path::PathBuf),

    /// The OS refused to start the process.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Launching requires a tokio runtime to pump the output streams.
    #[error("no async runtime available to run '{0}'")]
    NoRuntime(String),
}
