//! Diagnostic logging setup for the binary.

use log::LevelFilter;

/// Map command-line verbosity to a log level.
///
/// `--quiet` keeps errors only; otherwise each `-v` raises the level one
/// step from `warn` up to `trace`.
#[must_use]
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialise `env_logger` at `level`; `RUST_LOG` takes precedence.
///
/// Repeated calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();
    if builder.try_init().is_err() {
        // Already initialised.
    }
}
