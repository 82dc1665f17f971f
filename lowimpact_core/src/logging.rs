//! Tracing setup shared by the binaries.
//!
//! Everything is written to stderr; stdout belongs to the rendered screens
//! and `--json` output. `RUST_LOG` always wins over the chosen verbosity.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "lowimpact_core=debug,lowimpact=debug,info"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Quiet (`warn`) unless `verbose` is set.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Test subscriber that routes output through the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        for verbose in [false, true] {
            assert!(default_directive(verbose).parse::<EnvFilter>().is_ok());
        }
    }
}
