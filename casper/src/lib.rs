//! # casper
//!
//! Declarative form definition and validation for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `casper` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```rust
//! use casper::prelude::*;
//!
//! let schema = FormSchema::builder("Contact")
//!     .field("email", FieldSpec::email())
//!     .field("age", FieldSpec::integer().min_value(18).required(false))
//!     .build()
//!     .unwrap()
//!     .into_shared();
//!
//! let mut form = Form::new(schema);
//! form.bind_json(serde_json::json!({"email": "a@example.com", "age": "21"})).unwrap();
//! assert!(form.is_valid());
//! assert_eq!(form.clean_data().unwrap()["age"], Value::Int(21));
//! ```

/// Core value type, settings, logging, and error types.
pub use casper_core as core;

/// Fields, schemas, validators, and the form orchestrator.
#[cfg(feature = "forms")]
pub use casper_forms as forms;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use casper_cli as cli;

// Third-party re-exports
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types most programs need.
pub mod prelude {
    pub use casper_core::{CasperError, CasperResult, SchemaError, Settings, ValidationError, Value};

    #[cfg(feature = "forms")]
    pub use casper_forms::{
        ButtonSpec, Choice, FieldBuilder, FieldSpec, FieldType, Form, FormData, FormSchema,
        HookContext, SchemaBuilder, Validator,
    };
}
