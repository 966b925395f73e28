//! Utility functions for launch diagnostics

use nix::unistd::{AccessFlags, access};
use std::path::{Path, PathBuf};

/// Search path execvp falls back to when PATH is unset
pub const DEFAULT_PATH: &str = "/bin:/usr/bin";

/// Resolve a program name the way execvp will, without executing it.
///
/// Names containing `/` are taken as paths and only checked for the
/// execute bit. Returns `None` when nothing executable is found.
pub fn resolve_program_path(program: &str, path_value: Option<&str>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    if program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable(&candidate).then_some(candidate);
    }

    let path_value = path_value.unwrap_or(DEFAULT_PATH);
    path_value
        .split(':')
        .map(|entry| if entry.is_empty() { "." } else { entry })
        .map(|dir| Path::new(dir).join(program))
        .find(|candidate| is_executable(candidate))
}

/// Resolve against the current process PATH
pub fn which(program: &str) -> Option<PathBuf> {
    let path_value = std::env::var("PATH").ok();
    resolve_program_path(program, path_value.as_deref())
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
