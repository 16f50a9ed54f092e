//! `tracing-subscriber` initialization: an `env-filter`-driven subscriber
//! with a stable `event`/`keyword` field on every structured log site.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber. `json` selects structured
/// JSON output (suited to log aggregation in production); otherwise a
/// compact human-readable format is used. Defaults to `info` when
/// `RUST_LOG` is unset.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt().with_env_filter(filter);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
