mod cli;

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

fn use_color() -> bool {
    // Respect NO_COLOR environment variable
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

fn main() -> ExitCode {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version also arrive here
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    cli::setup_logging(args.quiet, args.verbose);

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if use_color() {
                eprintln!("\x1b[1;31merror:\x1b[0m {}", e);
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
