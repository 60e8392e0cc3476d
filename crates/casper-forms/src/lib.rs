//! # casper-forms
//!
//! Declarative form definition and validation. Forms are declared once as
//! a [`FormSchema`] of typed [`FieldSpec`]s, shared behind an `Arc`, and
//! instantiated per submission as a [`Form`] that binds data, validates it,
//! and exposes clean values and per-field errors.
//!
//! ## Modules
//!
//! - [`fields`] - Field types, field specs and their builder
//! - [`type_validators`] - Type-specific checks and coercions
//! - [`validators`] - User-attachable validators
//! - [`validation`] - The per-field pipeline and the form-wide clean pass
//! - [`schema`] - Form schemas, inheritance, buttons and hooks
//! - [`schema_loader`] - Declaring schemas from TOML or JSON
//! - [`bound_field`] - Per-instance field state and render descriptors
//! - [`form`] - The form orchestrator

pub mod bound_field;
pub mod fields;
pub mod form;
pub mod schema;
pub mod schema_loader;
pub mod type_validators;
pub mod validation;
pub mod validators;

pub use bound_field::{BoundField, FieldDescriptor};
pub use fields::{Choice, FieldBuilder, FieldSpec, FieldType, FileConstraints, PasswordPolicy};
pub use form::{Form, FormData};
pub use schema::{
    ButtonKind, ButtonSpec, FieldHook, FormMeta, FormSchema, HookContext, SchemaBuilder,
    SchemaEntry,
};
pub use validators::{
    FnValidator, MaxLengthValidator, MaxValueValidator, MinLengthValidator, MinValueValidator,
    RegexValidator, Validator,
};
