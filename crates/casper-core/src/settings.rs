//! Settings for the casper engine.
//!
//! This module provides the [`Settings`] struct, which holds engine-wide
//! configuration, and [`LazySettings`], a globally-accessible,
//! lazily-initialized settings instance.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Defaults applied to a form schema's metadata block when the schema does
/// not set them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefaults {
    /// Submission method.
    pub method: String,
    /// Submission target URL.
    pub url: String,
    /// Style hint passed through to renderers.
    pub style: Option<String>,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            method: "post".to_string(),
            url: String::new(),
            style: None,
        }
    }
}

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use casper_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.form.method, "post");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON logs).
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "casper_forms=trace").
    pub log_level: String,
    /// Form metadata defaults.
    pub form: FormDefaults,
    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            form: FormDefaults::default(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) or
/// [`try_get`](LazySettings::try_get) to access them.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or `None` when unconfigured.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Returns the configured form defaults, falling back to the built-in ones.
    pub fn form_defaults(&self) -> FormDefaults {
        self.try_get()
            .map_or_else(FormDefaults::default, |s| s.form.clone())
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
