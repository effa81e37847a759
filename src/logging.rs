//! Developer log
//!
//! Everything that should not bother the user (stale refreshes, failed
//! catalog reloads, request traces) goes through `tracing` to stderr. The
//! user-facing channel is the `NotificationLog`, whose entries are only
//! mirrored here at debug level.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter directive for a `-v` count
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::new(format!("tagdrive={}", level_for(verbosity)))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `verbosity`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbosity));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(stderr_layer.with_filter(filter))
        .try_init();
}
