//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "CODEWATCH_LOG";
/// Filter used when `CODEWATCH_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "codewatch=info";

static INIT: Once = Once::new();

/// Initialize the global subscriber.
///
/// Reads `CODEWATCH_LOG` for per-module log levels, e.g.
/// `CODEWATCH_LOG=codewatch_core::pipeline=debug,codewatch_storage=warn`.
/// Falls back to `codewatch=info`.
///
/// Idempotent. A subscriber installed elsewhere first is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
