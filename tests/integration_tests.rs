//! Integration tests for the redir binary
//!
//! Every test runs the built CLI against scratch files and checks the
//! printed status, the exit code and the redirected files.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;
use tempfile::TempDir;

static INTEGRATION_TEST_LOCK: Mutex<()> = Mutex::new(());

struct Scratch {
    dir: TempDir,
}

impl Scratch {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Executable shell script; the target receives no arguments
    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.file(name, &format!("#!/bin/sh\n{}\n", body));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

fn run_redir(program: &Path, input: &Path, output: &Path, error: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_redir"))
        .arg(program)
        .arg(input)
        .arg(output)
        .arg(error)
        .output()
        .expect("failed to run redir")
}

fn printed_status(output: &Output) -> i32 {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert!(!stdout.ends_with('\n'), "status must not end with newline");
    stdout.parse().expect("stdout should be a bare integer")
}

fn exit_code_of(raw: i32) -> Option<i32> {
    libc::WIFEXITED(raw).then(|| libc::WEXITSTATUS(raw))
}

/// Scenario from the contract: cat echoes one line
#[test]
fn test_cat_copies_input_line() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "hello\n");
    let out = scratch.path("out.txt");
    let err = scratch.path("err.txt");

    let output = run_redir(Path::new("cat"), &input, &out, &err);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"0");
    assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(&err).unwrap(), "");
}

/// Target exit code comes through the printed status
#[test]
fn test_target_exit_code_is_reported() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "");
    let prog = scratch.script("exit3.sh", "exit 3");

    let output = run_redir(&prog, &input, &scratch.path("out"), &scratch.path("err"));

    assert_eq!(output.status.code(), Some(0));
    let raw = printed_status(&output);
    assert_eq!(raw, 3 << 8);
    assert_eq!(exit_code_of(raw), Some(3));
}

/// Missing input file: child exits 42, parent still exits 0
#[test]
fn test_missing_input_reports_42() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let out = scratch.path("out.txt");

    let output = run_redir(
        Path::new("cat"),
        &scratch.path("absent.txt"),
        &out,
        &scratch.path("err.txt"),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(exit_code_of(printed_status(&output)), Some(42));
    assert!(!scratch.path("absent.txt").exists(), "input is never created");
    assert!(!out.exists());
}

/// Unknown executable: child exits 42 after redirecting
#[test]
fn test_missing_program_reports_42() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "");

    let output = run_redir(
        Path::new("no-such-program-redir-test"),
        &input,
        &scratch.path("out.txt"),
        &scratch.path("err.txt"),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(exit_code_of(printed_status(&output)), Some(42));
}

/// A target exiting 42 on its own looks the same on stdout
#[test]
fn test_target_exit_42_is_reported_verbatim() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "exit 42\n");
    let err = scratch.path("err.txt");

    let output = run_redir(Path::new("sh"), &input, &scratch.path("out.txt"), &err);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(exit_code_of(printed_status(&output)), Some(42));
    assert_eq!(fs::read_to_string(&err).unwrap(), "");
    // No setup failure was logged by the parent
    assert!(!String::from_utf8_lossy(&output.stderr).contains("failed"));
}

/// RUST_LOG takes precedence over the default warn level
#[test]
fn test_rust_log_enables_debug_output() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "hello\n");

    let output = Command::new(env!("CARGO_BIN_EXE_redir"))
        .env("RUST_LOG", "debug")
        .arg("cat")
        .arg(&input)
        .arg(scratch.path("out.txt"))
        .arg(scratch.path("err.txt"))
        .output()
        .unwrap();

    assert_eq!(output.stdout, b"0");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEBUG"), "stderr was: {}", stderr);
}

/// Without RUST_LOG or -v a clean run logs nothing
#[test]
fn test_default_log_level_is_quiet() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "hello\n");

    let output = Command::new(env!("CARGO_BIN_EXE_redir"))
        .env_remove("RUST_LOG")
        .arg("cat")
        .arg(&input)
        .arg(scratch.path("out.txt"))
        .arg(scratch.path("err.txt"))
        .output()
        .unwrap();

    assert_eq!(output.stdout, b"0");
    assert!(output.stderr.is_empty());
}

/// Output file is appended across runs
#[test]
fn test_output_is_appended() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let out = scratch.path("out.txt");
    let err = scratch.path("err.txt");

    let first = scratch.file("a.txt", "A");
    let second = scratch.file("b.txt", "B");

    assert_eq!(run_redir(Path::new("cat"), &first, &out, &err).stdout, b"0");
    assert_eq!(run_redir(Path::new("cat"), &second, &out, &err).stdout, b"0");

    assert_eq!(fs::read_to_string(&out).unwrap(), "AB");
}

/// Error file only keeps the last run
#[test]
fn test_error_is_truncated() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "");
    let out = scratch.path("out.txt");
    let err = scratch.path("err.txt");

    let long = scratch.script("long.sh", "echo first-run-message >&2");
    let short = scratch.script("short.sh", "echo 2nd >&2");

    run_redir(&long, &input, &out, &err);
    assert_eq!(fs::read_to_string(&err).unwrap(), "first-run-message\n");

    run_redir(&short, &input, &out, &err);
    assert_eq!(fs::read_to_string(&err).unwrap(), "2nd\n");
}

/// Created files get 0660 minus umask, never more
#[test]
fn test_created_file_permissions() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "x");
    let out = scratch.path("out.txt");
    let err = scratch.path("err.txt");

    run_redir(Path::new("cat"), &input, &out, &err);

    for path in [&out, &err] {
        let mode = fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o660, 0, "{} has mode {:o}", path.display(), mode);
    }
}

/// Signal death shows up as the raw signal number
#[test]
fn test_signalled_child_status() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "");
    let prog = scratch.script("die.sh", "kill -TERM $$");

    let output = run_redir(&prog, &input, &scratch.path("out"), &scratch.path("err"));

    assert_eq!(output.status.code(), Some(0));
    let raw = printed_status(&output);
    assert!(libc::WIFSIGNALED(raw));
    assert_eq!(libc::WTERMSIG(raw), libc::SIGTERM);
}

/// The target gets only its own name as argv
#[test]
fn test_target_receives_no_arguments() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "");
    let out = scratch.path("out.txt");
    let prog = scratch.script("argc.sh", "echo $#");

    run_redir(&prog, &input, &out, &scratch.path("err"));

    assert_eq!(fs::read_to_string(&out).unwrap(), "0\n");
}

/// Wrong argument count is a usage error, not a launch
#[test]
fn test_usage_error_without_all_files() {
    let output = Command::new(env!("CARGO_BIN_EXE_redir"))
        .args(["cat", "in.txt"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
