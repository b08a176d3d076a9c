//! Tracing subscriber setup. Logs go to stderr; stdout carries results.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Level used when neither `LOG_LEVEL` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Safe to call more than once.
pub(crate) fn init(json: bool) {
    let filter = filter_from(std::env::var("LOG_LEVEL").ok(), std::env::var("RUST_LOG").ok());
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result
        && !e.to_string().contains("already")
    {
        eprintln!("failed to initialize logging: {e}");
    }
}

/// `LOG_LEVEL` first, then `RUST_LOG`, then [`DEFAULT_FILTER`]. Invalid
/// directives fall through to the next source.
fn filter_from(log_level: Option<String>, rust_log: Option<String>) -> EnvFilter {
    [log_level, rust_log]
        .into_iter()
        .flatten()
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
