//! Setup failure reporting from child to parent
//!
//! The child's exit status only carries the sentinel code, so the launcher
//! also hands the child the write end of a close-on-exec pipe. A child that
//! fails before its target runs writes one fixed-size record to it; a
//! successful exec closes the pipe and the parent reads EOF.

use crate::errors::{LaunchError, Result};
use crate::execution::request::StreamSlot;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};

/// Size of one encoded [`SetupFailure`]: stage tag + native-endian errno
pub const RECORD_LEN: usize = 5;

/// Step of the child setup that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    OpenInput,
    RedirectInput,
    OpenOutput,
    RedirectOutput,
    OpenError,
    RedirectError,
    Exec,
}

impl SetupStage {
    pub fn open(slot: StreamSlot) -> Self {
        match slot {
            StreamSlot::Stdin => SetupStage::OpenInput,
            StreamSlot::Stdout => SetupStage::OpenOutput,
            StreamSlot::Stderr => SetupStage::OpenError,
        }
    }

    pub fn redirect(slot: StreamSlot) -> Self {
        match slot {
            StreamSlot::Stdin => SetupStage::RedirectInput,
            StreamSlot::Stdout => SetupStage::RedirectOutput,
            StreamSlot::Stderr => SetupStage::RedirectError,
        }
    }

    fn tag(self) -> u8 {
        match self {
            SetupStage::OpenInput => 1,
            SetupStage::RedirectInput => 2,
            SetupStage::OpenOutput => 3,
            SetupStage::RedirectOutput => 4,
            SetupStage::OpenError => 5,
            SetupStage::RedirectError => 6,
            SetupStage::Exec => 7,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => SetupStage::OpenInput,
            2 => SetupStage::RedirectInput,
            3 => SetupStage::OpenOutput,
            4 => SetupStage::RedirectOutput,
            5 => SetupStage::OpenError,
            6 => SetupStage::RedirectError,
            7 => SetupStage::Exec,
            _ => return None,
        })
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetupStage::OpenInput => "open input file",
            SetupStage::RedirectInput => "redirect stdin",
            SetupStage::OpenOutput => "open output file",
            SetupStage::RedirectOutput => "redirect stdout",
            SetupStage::OpenError => "open error file",
            SetupStage::RedirectError => "redirect stderr",
            SetupStage::Exec => "exec",
        };
        f.write_str(name)
    }
}

/// Why a child never reached its target program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupFailure {
    pub stage: SetupStage,
    pub errno: Errno,
}

impl SetupFailure {
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0] = self.stage.tag();
        buf[1..].copy_from_slice(&(self.errno as i32).to_ne_bytes());
        buf
    }

    pub fn decode(buf: &[u8; RECORD_LEN]) -> Option<Self> {
        let stage = SetupStage::from_tag(buf[0])?;
        let mut errno = [0u8; 4];
        errno.copy_from_slice(&buf[1..]);
        Some(Self {
            stage,
            errno: Errno::from_raw(i32::from_ne_bytes(errno)),
        })
    }
}

impl fmt::Display for SetupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.errno.desc())
    }
}

/// Close-on-exec pipe carrying at most one [`SetupFailure`]
pub struct ReportPipe {
    reader: File,
    writer: File,
}

impl ReportPipe {
    pub fn new() -> Result<Self> {
        let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC).map_err(LaunchError::Pipe)?;
        Ok(Self {
            reader: File::from(read_end),
            writer: File::from(write_end),
        })
    }

    /// Split into the parent's reader and the child's writer
    pub fn split(self) -> (ReportReader, ReportWriter) {
        (ReportReader(self.reader), ReportWriter(self.writer))
    }
}

/// Child side. Writes from a stack buffer only.
pub struct ReportWriter(File);

impl ReportWriter {
    pub fn send(&mut self, failure: SetupFailure) {
        // The child exits right after this; nothing useful to do on error.
        let _ = self.0.write_all(&failure.encode());
    }
}

/// Parent side
pub struct ReportReader(File);

impl ReportReader {
    /// Block until the child execs (EOF) or reports a failure.
    ///
    /// The caller must have dropped its own [`ReportWriter`] first, or this
    /// never sees EOF.
    pub fn receive(mut self) -> Result<Option<SetupFailure>> {
        let mut buf = [0u8; RECORD_LEN];
        match self.0.read_exact(&mut buf) {
            Ok(()) => Ok(SetupFailure::decode(&buf)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
