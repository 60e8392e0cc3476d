//! # casper-core
//!
//! Core types, settings, and error types for the casper form engine.
//! This crate has no dependency on the forms layer and provides the
//! foundation shared by all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The [`Value`] type carried by submissions and clean data
//! - [`settings`] - Engine settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{CasperError, CasperResult, SchemaError, ValidationError};
pub use settings::{FormDefaults, Settings, SETTINGS};
pub use value::Value;
