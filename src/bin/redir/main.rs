//! redir CLI - `PROGRAM < INPUT >> OUTPUT 2> ERROR`, then print the wait status

mod cli;
mod logging;
mod runner;

use clap::Parser;
use cli::Cli;
use console::style;
use runner::run_redirected;
use std::io::Write;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    match run_redirected(&cli) {
        Ok(status) => {
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "{}", status);
            let _ = stdout.flush();
        }
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}
