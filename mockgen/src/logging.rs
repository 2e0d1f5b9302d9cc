//! Diagnostic tracing for reflection runs.
//!
//! Output goes to stderr, interleaved with the toolchain's pass-through
//! diagnostics, so lines are kept short: no timestamps, no targets. Stdout
//! is reserved for the command's result.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "MOCKGEN_LOG";

/// Used when neither variable holds a valid filter. Still reports
/// workspaces that could not be removed.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber.
///
/// # Example
/// ```bash
/// MOCKGEN_LOG=mockgen=debug mockgen reflect example.com/widget Fetcher
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(|key| std::env::var(key).ok()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .compact(),
        )
        .init();
}

/// First parseable directive from `MOCKGEN_LOG`, then `RUST_LOG`, else the default.
fn env_filter(lookup: impl Fn(&str) -> Option<String>) -> EnvFilter {
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_variable_wins_over_rust_log() {
        let filter = env_filter(|key| match key {
            LOG_ENV => Some("mockgen=debug".to_string()),
            _ => Some("error".to_string()),
        });
        assert_eq!(filter.to_string(), "mockgen=debug");
    }

    #[test]
    fn falls_back_to_rust_log() {
        let filter = env_filter(|key| (key == EnvFilter::DEFAULT_ENV).then(|| "info".to_string()));
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn defaults_to_warn() {
        assert_eq!(env_filter(|_| None).to_string(), DEFAULT_FILTER);
    }
}
