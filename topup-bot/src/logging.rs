//! Structured logging setup.
//!
//! Production output is flattened JSON. `DEBUG_MODE` switches to the
//! human-readable formatter. `RUST_LOG` overrides the configured level.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
pub fn init(level: LevelFilter, human_readable: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let json = (!human_readable).then(|| fmt::layer().json().flatten_event(true));
    let pretty = human_readable.then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}
