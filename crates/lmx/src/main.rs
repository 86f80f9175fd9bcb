mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, Verbosity};
use crate::output::OutputFormat;

/// Frame, deframe and exercise LMX serial byte streams.
#[derive(Parser, Debug)]
#[command(name = "lmx", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format; defaults to `table` on a terminal, `json` otherwise.
    #[arg(long, short = 'f', value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Diagnostic format on stderr.
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "LMX_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Diagnostic verbosity on stderr; `quiet` silences it entirely.
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "LMX_LOG_LEVEL",
        global = true
    )]
    log_level: Verbosity,
}

fn main() {
    std::process::exit(run(Cli::parse()));
}

fn run(cli: Cli) -> i32 {
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            err.code
        }
    }
}
