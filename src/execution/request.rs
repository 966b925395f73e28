//! Launch request: what to run and where its standard streams go

use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

/// Permission bits for output and error files created by the launcher
pub const DEFAULT_FILE_MODE: u32 = 0o660;

/// Child exit code used for every setup failure (open, dup2, exec)
pub const DEFAULT_SETUP_FAILURE_CODE: i32 = 42;

/// How a redirection target is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only, the file must already exist
    Read,
    /// Write-only, created if absent, appended if present
    Append,
    /// Write-only, created if absent, truncated if present
    Truncate,
}

impl OpenMode {
    pub fn flags(self) -> OFlag {
        match self {
            OpenMode::Read => OFlag::O_RDONLY,
            OpenMode::Append => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
            OpenMode::Truncate => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
        }
    }

    pub fn creates(self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

/// One of the three standard stream slots of the child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSlot {
    Stdin,
    Stdout,
    Stderr,
}

impl StreamSlot {
    pub const ALL: [StreamSlot; 3] = [StreamSlot::Stdin, StreamSlot::Stdout, StreamSlot::Stderr];

    pub fn fd(self) -> RawFd {
        match self {
            StreamSlot::Stdin => libc::STDIN_FILENO,
            StreamSlot::Stdout => libc::STDOUT_FILENO,
            StreamSlot::Stderr => libc::STDERR_FILENO,
        }
    }

    /// `< in`, `>> out`, `2> err`
    pub fn open_mode(self) -> OpenMode {
        match self {
            StreamSlot::Stdin => OpenMode::Read,
            StreamSlot::Stdout => OpenMode::Append,
            StreamSlot::Stderr => OpenMode::Truncate,
        }
    }
}

/// Everything needed to launch one redirected child.
///
/// Immutable once built: the builder methods consume and return `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Program to execute, searched on PATH when it has no `/`
    pub program: String,
    /// File bound to stdin
    pub input: PathBuf,
    /// File bound to stdout
    pub output: PathBuf,
    /// File bound to stderr
    pub error: PathBuf,
    /// Permission bits for created files (umask still applies)
    pub file_mode: u32,
    /// Exit code of the child when setup fails before the target runs
    pub setup_failure_code: i32,
}

impl LaunchRequest {
    pub fn new(
        program: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        error: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            input: input.into(),
            output: output.into(),
            error: error.into(),
            file_mode: DEFAULT_FILE_MODE,
            setup_failure_code: DEFAULT_SETUP_FAILURE_CODE,
        }
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn with_setup_failure_code(mut self, code: i32) -> Self {
        self.setup_failure_code = code;
        self
    }

    /// Path bound to the given slot
    pub fn path_for(&self, slot: StreamSlot) -> &Path {
        match slot {
            StreamSlot::Stdin => &self.input,
            StreamSlot::Stdout => &self.output,
            StreamSlot::Stderr => &self.error,
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits_truncate(self.file_mode as libc::mode_t)
    }
}
