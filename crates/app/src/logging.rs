//! Tracing initialization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "NIBBLE_HUFF_LOG";

/// Install a stderr subscriber filtered by `NIBBLE_HUFF_LOG`.
///
/// Format: `NIBBLE_HUFF_LOG=nibble_huff_core=trace`. Falls back to `warn`
/// when the variable is unset or invalid.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .init();
}
