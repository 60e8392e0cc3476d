//! Logging integration for the casper engine.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-validation spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info",
/// "casper_forms=trace"). In debug mode a pretty, human-readable format is
/// used; otherwise a structured JSON format is used. Calling this more than
/// once is harmless: later calls leave the first subscriber in place.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form validation run.
///
/// # Examples
///
/// ```
/// use casper_core::logging::validation_span;
///
/// let span = validation_span("ContactForm");
/// let _guard = span.enter();
/// tracing::debug!("validating");
/// ```
pub fn validation_span(form_name: &str) -> tracing::Span {
    tracing::debug_span!("validate", form = form_name)
}
