//! Tracing subscriber initialization for the `filetally` binary.
//!
//! Logs (one warning per skipped line, one error per failed source) go to
//! stderr; reports go to stdout.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `FILETALLY_LOG` env var
//! 2. `RUST_LOG` env var
//! 3. CLI flags (`-v` → debug, `-q` → error)
//! 4. `log.filter` from the config file (default `warn`)

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Level forced by the flag, if any.
    pub const fn forced_level(self) -> Option<Level> {
        match self {
            Self::Quiet => Some(Level::ERROR),
            Self::Normal => None,
            Self::Verbose => Some(Level::DEBUG),
        }
    }
}

/// Install the global subscriber. Call once, early in `main()`.
pub fn init_subscriber(verbosity: Verbosity, config_filter: &str) {
    let filter = build_env_filter(verbosity, config_filter);

    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn build_env_filter(verbosity: Verbosity, config_filter: &str) -> EnvFilter {
    if let Ok(directives) = std::env::var("FILETALLY_LOG") {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if let Some(level) = verbosity.forced_level() {
        return EnvFilter::default().add_directive(level.into());
    }

    EnvFilter::try_new(config_filter).unwrap_or_else(|_| EnvFilter::new("warn"))
}
