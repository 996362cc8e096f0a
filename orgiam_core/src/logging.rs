//! Logging utilities for orgiam-wide output to stdout.
//!

// Re-exports for convenience
pub use tracing::metadata::LevelFilter;
pub use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{util::SubscriberInitExt, Layer};

/// Default filter when `RUST_LOG` isn't set. Keeps the HTTP stack quiet.
const DEFAULT_ENV_FILTER: &str = "orgiam_core=debug,orgiam_gcp=debug,orgiam_cli=debug,reqwest=warn";

/// Set up basic logging.
///
/// `RUST_LOG` narrows which targets are eligible; `level` caps what is
/// actually printed and defaults to INFO.
pub fn setup(level: Option<LevelFilter>) {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_ENV_FILTER.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(level.unwrap_or(LevelFilter::INFO))
        .boxed();
    let logging_layers = vec![tracing_subscriber::EnvFilter::new(env).boxed(), fmt_layer];

    // try_init so repeated setup (e.g. from tests) doesn't panic
    if tracing_subscriber::registry()
        .with(logging_layers)
        .try_init()
        .is_err()
    {
        debug!("logging was already set up");
        return;
    }

    debug!("logging set up");
}
