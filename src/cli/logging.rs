//! Diagnostics on stderr through `tracing_subscriber`.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Level directive for the `-q`/`-v` flags.
fn directives(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "aces=error",
        (false, 0) => "aces=warn",
        (false, 1) => "aces=info",
        (false, 2) => "aces=debug",
        (false, _) => "aces=trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the flags.
pub fn setup_logging(quiet: bool, verbose: u8) {
    let color = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbose > 1)
        .with_ansi(color);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directives(quiet, verbose))),
        )
        .with(main_layer)
        .init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(directives(false, 0), "aces=warn");
        assert_eq!(directives(true, 3), "aces=error");
        assert_eq!(directives(false, 2), "aces=debug");
        assert_eq!(directives(false, 9), "aces=trace");
    }
}
