//! Rebinding of a single standard stream slot
//!
//! Runs in the forked child before exec: no allocation, no logging.

use crate::execution::report::{SetupFailure, SetupStage};
use crate::execution::request::StreamSlot;
use nix::fcntl::open;
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use std::ffi::CStr;

/// Open `path` with the slot's mode and make it the slot's descriptor.
///
/// The temporary descriptor is closed once the slot holds a copy. When
/// `open` already returned the slot number (the slot was closed in the
/// parent) the descriptor is kept as is.
pub fn redirect_slot(
    slot: StreamSlot,
    path: &CStr,
    mode: Mode,
) -> std::result::Result<(), SetupFailure> {
    let fd = open(path, slot.open_mode().flags(), mode).map_err(|errno| SetupFailure {
        stage: SetupStage::open(slot),
        errno,
    })?;

    let target = slot.fd();
    if fd == target {
        return Ok(());
    }

    let redirected = dup2(fd, target);
    // The child execs or exits next either way; a failed close changes nothing.
    let _ = close(fd);
    redirected.map_err(|errno| SetupFailure {
        stage: SetupStage::redirect(slot),
        errno,
    })?;

    Ok(())
}
