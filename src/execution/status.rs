//! Raw wait status of a terminated child

use nix::sys::signal::Signal;
use std::fmt;

/// The status word filled in by `waitpid`, kept undecoded.
///
/// `Display` prints the raw integer, which is what the CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationStatus(i32);

impl TerminationStatus {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    /// Exit code for a normal exit
    pub fn exit_code(self) -> Option<i32> {
        if libc::WIFEXITED(self.0) {
            Some(libc::WEXITSTATUS(self.0))
        } else {
            None
        }
    }

    /// Terminating signal when the child was killed
    pub fn signal(self) -> Option<Signal> {
        if libc::WIFSIGNALED(self.0) {
            Signal::try_from(libc::WTERMSIG(self.0)).ok()
        } else {
            None
        }
    }

    pub fn core_dumped(self) -> bool {
        libc::WIFSIGNALED(self.0) && libc::WCOREDUMP(self.0)
    }

    pub fn success(self) -> bool {
        self.exit_code() == Some(0)
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
