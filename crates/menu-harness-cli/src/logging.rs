//! Log subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter for `verbosity`, unless `RUST_LOG` holds a valid directive
#[must_use]
pub fn log_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.filter_directive()))
}

/// Install the global subscriber, logging to stderr
///
/// A second call is a no-op.
pub fn init_logging(verbosity: Verbosity) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(log_filter(verbosity, rust_log.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
