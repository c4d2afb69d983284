use nametagkit::cli::{Cli, USAGE};
use nametagkit::{commands, init_logging, LogOptions};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            return ExitCode::from(commands::EXIT_INVALID_INPUT);
        }
    };

    if let Err(e) = init_logging(LogOptions {
        verbose: cli.global.verbose,
        json: cli.global.log_json,
    }) {
        eprintln!("warning: {}", e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match commands::run(&cli, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(commands::EXIT_FAILURE)
        }
    }
}
