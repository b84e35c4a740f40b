//! Logging integration for pdo-rs.
//!
//! Configures a [`tracing`] subscriber from [`Settings`](crate::settings::Settings)
//! and provides the span that wraps every compiled query.

use crate::settings::Settings;

/// Installs the global tracing subscriber described by `settings`.
///
/// `settings.log_level` is an `EnvFilter` directive; an invalid directive
/// falls back to `info`. Debug mode logs in a pretty, human-readable format,
/// otherwise each event is a JSON line. Installing twice is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a span for a query against `table`.
///
/// # Examples
///
/// ```
/// use pdo_rs_core::logging::query_span;
///
/// let span = query_span("user");
/// let _guard = span.enter();
/// tracing::debug!("compiling");
/// ```
pub fn query_span(table: &str) -> tracing::Span {
    tracing::debug_span!("query", table = table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        let settings = Settings {
            log_level: "not a [valid directive".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&Settings::default());
    }

    #[test]
    fn test_query_span_enters() {
        let span = query_span("user");
        let _guard = span.enter();
        tracing::debug!("inside query span");
    }
}
