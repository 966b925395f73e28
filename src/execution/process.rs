//! Fork, redirect, exec, wait
//!
//! Order of operations in the child:
//! 1. stdin  <- input file  (read-only, must exist)
//! 2. stdout <- output file (append, created 0660)
//! 3. stderr <- error file  (truncate, created 0660)
//! 4. execvp the target with only its own name as argv
//!
//! Any failure ends the child with the setup failure code. Everything the
//! child touches is prepared before fork so it never allocates.

use crate::errors::{LaunchError, Result};
use crate::execution::redirect::redirect_slot;
use crate::execution::report::{ReportPipe, ReportWriter, SetupFailure, SetupStage};
use crate::execution::request::{LaunchRequest, StreamSlot};
use crate::execution::status::TerminationStatus;

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::stat::Mode;
use nix::unistd::{ForkResult, Pid, fork};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use std::time::Instant;

/// Result of one launch
#[derive(Debug, Clone)]
pub struct LaunchResult {
    /// Process ID of the reaped child
    pub pid: Pid,
    /// Raw wait status
    pub status: TerminationStatus,
    /// Set when the child died before its target started
    pub setup_failure: Option<SetupFailure>,
    /// Wall time from fork to reap in milliseconds
    pub wall_time_ms: u64,
}

impl LaunchResult {
    /// The target program actually ran (whatever its outcome)
    pub fn target_ran(&self) -> bool {
        self.setup_failure.is_none()
    }
}

/// Request converted to C strings ahead of fork
struct PreparedLaunch {
    program: CString,
    input: CString,
    output: CString,
    error: CString,
    mode: Mode,
    setup_failure_code: i32,
}

impl PreparedLaunch {
    fn from_request(request: &LaunchRequest) -> Result<Self> {
        if request.program.is_empty() {
            return Err(LaunchError::InvalidRequest(
                "program name is empty".to_string(),
            ));
        }

        let program = CString::new(request.program.as_bytes()).map_err(|_| {
            LaunchError::InvalidRequest("program name contains nul byte".to_string())
        })?;

        Ok(Self {
            program,
            input: path_cstring(&request.input)?,
            output: path_cstring(&request.output)?,
            error: path_cstring(&request.error)?,
            mode: request.mode(),
            setup_failure_code: request.setup_failure_code,
        })
    }

    fn path_for(&self, slot: StreamSlot) -> &CString {
        match slot {
            StreamSlot::Stdin => &self.input,
            StreamSlot::Stdout => &self.output,
            StreamSlot::Stderr => &self.error,
        }
    }
}

fn path_cstring(path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        LaunchError::InvalidRequest(format!("path contains nul byte: {}", path.display()))
    })
}

/// Process launcher
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Run `request.program` with its standard streams bound to the
    /// request's files and block until it terminates.
    ///
    /// Only parent-side failures are errors. A child that cannot open a
    /// file or exec still yields `Ok`, with the setup failure code in the
    /// status and the failing step in `setup_failure`.
    pub fn launch(request: &LaunchRequest) -> Result<LaunchResult> {
        let prepared = PreparedLaunch::from_request(request)?;
        let (reader, writer) = ReportPipe::new()?.split();

        debug!(
            "Launching {} < {} >> {} 2> {}",
            request.program,
            request.input.display(),
            request.output.display(),
            request.error.display()
        );

        let start = Instant::now();

        // SAFETY: the child only runs async-signal-safe calls on data
        // prepared above, then execs or _exits.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => Self::child_setup(&prepared, writer),
            Ok(ForkResult::Parent { child }) => {
                // Parent: close our copy of the write end so a successful
                // exec shows up as EOF.
                drop(writer);

                let received = reader.receive();
                let status = wait_for_child(child)?;
                let setup_failure = received?;
                let wall_time_ms =
                    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match setup_failure {
                    Some(failure) => warn!("{}: {}", request.program, failure),
                    None => debug!("{} (pid {}) exited with status {}", request.program, child, status),
                }

                Ok(LaunchResult {
                    pid: child,
                    status,
                    setup_failure,
                    wall_time_ms,
                })
            }
            Err(errno) => Err(LaunchError::Fork(errno)),
        }
    }

    /// Child side of the fork. Never returns.
    fn child_setup(prepared: &PreparedLaunch, mut report: ReportWriter) -> ! {
        for slot in StreamSlot::ALL {
            if let Err(failure) = redirect_slot(slot, prepared.path_for(slot), prepared.mode) {
                report.send(failure);
                exit_child(prepared.setup_failure_code);
            }
        }

        let argv: [*const libc::c_char; 2] = [prepared.program.as_ptr(), ptr::null()];
        // SAFETY: argv is NULL-terminated and points into CStrings that
        // outlive the call; execvp only returns on failure.
        unsafe {
            libc::execvp(prepared.program.as_ptr(), argv.as_ptr());
        }

        report.send(SetupFailure {
            stage: SetupStage::Exec,
            errno: Errno::last(),
        });
        exit_child(prepared.setup_failure_code)
    }
}

/// End a forked child without running atexit handlers or destructors
pub(crate) fn exit_child(code: i32) -> ! {
    // SAFETY: _exit only terminates the calling process
    unsafe { libc::_exit(code) }
}

/// Wait for child process and return its raw status
pub fn wait_for_child(pid: Pid) -> Result<TerminationStatus> {
    let mut status: libc::c_int = 0;

    loop {
        // SAFETY: status is a valid out-pointer for the duration of the call
        let rc = unsafe { libc::waitpid(pid.as_raw(), &mut status, 0) };
        if rc == pid.as_raw() {
            return Ok(TerminationStatus::from_raw(status));
        }
        match Errno::last() {
            Errno::EINTR => continue,
            errno => return Err(LaunchError::Wait(errno)),
        }
    }
}
