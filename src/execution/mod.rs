//! Execution layer: redirected child processes
//!
//! This module forks a child, binds its stdin/stdout/stderr to files,
//! execs the target program and reaps it.
//!
//! # Features
//!
//! - **Redirection**: `< input`, `>> output`, `2> error` semantics
//! - **Setup reporting**: which step failed before the target ran
//! - **Raw status**: the undecoded `waitpid` status word
//!
//! # Examples
//!
//! ```ignore
//! use redir::execution::{LaunchRequest, ProcessLauncher};
//!
//! let request = LaunchRequest::new("cat", "in.txt", "out.txt", "err.txt");
//! let result = ProcessLauncher::launch(&request)?;
//! print!("{}", result.status);
//! ```

pub mod process;
pub mod redirect;
pub mod report;
pub mod request;
pub mod status;

pub use process::{LaunchResult, ProcessLauncher, wait_for_child};
pub use report::{SetupFailure, SetupStage};
pub use request::{LaunchRequest, OpenMode, StreamSlot};
pub use status::TerminationStatus;
