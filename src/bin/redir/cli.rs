use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "redir")]
#[command(version, about = "Run a program with stdin, stdout and stderr redirected to files", long_about = None)]
#[command(after_help = "Equivalent to: PROGRAM < INPUT >> OUTPUT 2> ERROR

Prints the raw wait status of PROGRAM (no newline) and exits 0.
A child that cannot open a file or exec PROGRAM exits with code 42.

EXAMPLES:
    redir cat in.txt out.txt err.txt
    redir -v ./build.sh /dev/null build.log build.err
")]
pub struct Cli {
    /// Program to run, searched on PATH (receives no arguments)
    #[arg(value_name = "PROGRAM")]
    pub program: String,

    /// File bound to stdin (must exist)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// File bound to stdout (appended, created if absent)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// File bound to stderr (truncated, created if absent)
    #[arg(value_name = "ERROR")]
    pub error: PathBuf,

    /// Show verbose output on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
