//! Error types for launch operations

use nix::errno::Errno;
use std::io;
use thiserror::Error;

/// Result type for launch operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Errors the parent side of a launch can hit.
///
/// Failures inside the child never surface here: the child reports them
/// through its termination status (and the setup report pipe).
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("fork failed: {0}")]
    Fork(Errno),

    #[error("report pipe failed: {0}")]
    Pipe(Errno),

    #[error("waitpid failed: {0}")]
    Wait(Errno),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
