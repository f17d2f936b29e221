#![deny(missing_docs)]
//! Shared logging utilities for the reachcheck workspace.
//!
//! Every crate logs through the `engine_*` macros so the backend can be swapped
//! in one place. The binary installs a `simplelog` backend; tests use
//! [`initialize_for_tests`].

use log::LevelFilter;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Maps command line verbosity to a level filter.
///
/// `quiet` wins over any number of `-v` flags. Zero verbosity logs warnings
/// and errors only, so probe chatter stays out of the result listing.
pub fn level_for_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )]);
}

#[cfg(test)]
mod tests {
    use super::level_for_verbosity;
    use log::LevelFilter;

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(level_for_verbosity(3, true), LevelFilter::Error);
    }

    #[test]
    fn verbosity_steps_up_to_trace() {
        assert_eq!(level_for_verbosity(0, false), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1, false), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2, false), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9, false), LevelFilter::Trace);
    }
}
