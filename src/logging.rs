//! Tracing setup for the `credvault` binary.
//!
//! Logs go to stderr so stdout stays clean for command output (a raw
//! token from `login --raw`, for instance).  The filter is read from
//! `CREDVAULT_LOG` using the usual `EnvFilter` directive syntax.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CREDVAULT_LOG";

/// Install the global subscriber.  `default_level` applies when
/// `CREDVAULT_LOG` is unset or invalid.  Calling it twice is a no-op.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .try_init();
}
