use log::{debug, info, warn};
use redir::utils;
use redir::{LaunchRequest, ProcessLauncher, TerminationStatus};

use crate::cli::Cli;

impl From<&Cli> for LaunchRequest {
    fn from(cli: &Cli) -> Self {
        LaunchRequest::new(
            cli.program.clone(),
            cli.input.clone(),
            cli.output.clone(),
            cli.error.clone(),
        )
    }
}

/// Launch the requested program and return its raw status.
///
/// Child-side failures are not errors here: they come back as a status
/// carrying the setup failure code.
pub fn run_redirected(cli: &Cli) -> Result<TerminationStatus, Box<dyn std::error::Error>> {
    let request = LaunchRequest::from(cli);

    match utils::which(&request.program) {
        Some(path) => debug!("Resolved {} to {}", request.program, path.display()),
        None => warn!("{} not found on PATH, exec will fail", request.program),
    }

    let result = ProcessLauncher::launch(&request)?;

    info!(
        "{} finished in {}ms (pid {})",
        request.program, result.wall_time_ms, result.pid
    );

    if let Some(code) = result.status.exit_code() {
        debug!("exit code {}", code);
    } else if let Some(signal) = result.status.signal() {
        debug!(
            "killed by {}{}",
            signal,
            if result.status.core_dumped() {
                " (core dumped)"
            } else {
                ""
            }
        );
    }

    Ok(result.status)
}
