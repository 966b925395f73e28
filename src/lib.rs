//! redir: run a program with redirected standard streams
//!
//! Forks a child, binds its stdin, stdout and stderr to files the way
//! `program < input >> output 2> error` would, execs the program and
//! reports the child's raw wait status.
//!
//! # Modules
//!
//! - **execution**: fork, redirect, exec and wait
//! - **errors**: parent-side launch errors
//! - **utils**: PATH lookup helpers
//!
//! # Example
//!
//! ```ignore
//! use redir::{LaunchRequest, ProcessLauncher};
//!
//! let request = LaunchRequest::new("cat", "in.txt", "out.txt", "err.txt");
//! let result = ProcessLauncher::launch(&request)?;
//! println!("status: {}", result.status);
//! ```

pub mod errors;
pub mod execution;
pub mod utils;

// Public API
pub use errors::{LaunchError, Result};
pub use execution::{
    LaunchRequest, LaunchResult, ProcessLauncher, SetupFailure, SetupStage, TerminationStatus,
};
