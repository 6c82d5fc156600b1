//! Logging setup
//!
//! Everything in the crate logs through the `log` facade; the binary
//! installs `env_logger` here. `RUST_LOG` still overrides the default
//! filter.

use env_logger::{Builder, Env};

/// Installs the global logger with `info` as the default level, or `debug`
/// when `debug` is set
pub fn init(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

/// Installs a test logger. Safe to call from every test.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
