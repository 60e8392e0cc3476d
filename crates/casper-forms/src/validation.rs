//! Validation pipeline for form processing.
//!
//! Every field runs the same pipeline on its effective value:
//!
//! 1. Presence checks (required, then null, then blank). A null that passes
//!    all three short-circuits the rest of the pipeline.
//! 2. The optional pattern gate, matched from the start of the value.
//! 3. Type-specific validation and coercion.
//! 4. User validators, in declaration order.
//!
//! The first failure stops the pipeline for that field. Failures never stop
//! other fields from being validated; [`clean_fields`] visits every field.

use std::collections::HashMap;

use casper_core::{ValidationError, Value};
use regex::Regex;

use crate::bound_field::BoundField;
use crate::fields::FieldSpec;
use crate::schema::{FormSchema, HookContext};
use crate::type_validators::clean_typed_value;

/// Checks that a value is present (or allowed to be absent).
///
/// Returns `Ok(true)` when the value is an allowed null and the remaining
/// stages must be skipped.
pub fn check_presence(spec: &FieldSpec, value: &Value) -> Result<bool, ValidationError> {
    if spec.required() && value.is_empty() {
        return Err(ValidationError::new("This field is required", "required"));
    }
    if !spec.allow_null() && value.is_null() {
        return Err(ValidationError::new("This field cannot be null", "null"));
    }
    // Null counts as blank here.
    if !spec.allow_blank() && value.is_empty() {
        return Err(ValidationError::new("This field cannot be blank", "blank"));
    }
    Ok(value.is_null())
}

/// Returns `true` if the regex matches at the very start of `text`.
fn matches_from_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|m| m.start() == 0)
}

/// Runs the full single-field pipeline and returns the clean value.
///
/// The error carries the specific failure; [`surface_message`] decides what
/// the user sees.
pub fn run_pipeline(spec: &FieldSpec, value: Value) -> Result<Value, ValidationError> {
    if check_presence(spec, &value)? {
        return Ok(Value::Null);
    }

    if let Some(pattern) = spec.pattern() {
        if !matches_from_start(pattern, &value.to_string()) {
            return Err(ValidationError::new(
                format!("Value does not match the pattern {}", pattern.as_str()),
                "pattern",
            ));
        }
    }

    let mut clean = clean_typed_value(spec.field_type(), value)?;

    for validator in spec.validators() {
        clean = validator.validate(clean).map_err(|err| {
            tracing::trace!(validator = validator.name(), code = %err.code, "validator rejected value");
            err
        })?;
    }

    Ok(clean)
}

/// The message shown for a pipeline failure: the field's custom error if
/// one is declared, otherwise the specific message.
pub fn surface_message(spec: &FieldSpec, err: &ValidationError) -> String {
    spec.custom_error()
        .map_or_else(|| err.message.clone(), str::to_string)
}

/// Validates every bound field and runs the schema's hooks.
///
/// Hooks run only for fields whose pipeline succeeded, in schema order.
/// A hook's error message is surfaced as-is; its returned value replaces
/// the clean value. Returns the clean values of passing fields and the
/// surfaced messages of failing ones.
pub fn clean_fields(
    schema: &FormSchema,
    fields: &mut [BoundField],
    ctx: &HookContext<'_>,
) -> (HashMap<String, Value>, HashMap<String, String>) {
    let mut clean_data = HashMap::new();
    let mut errors = HashMap::new();

    for field in fields.iter_mut() {
        let name = field.name().to_string();
        let result = field.validate().and_then(|clean| match schema.hook(&name) {
            Some(hook) => hook(&clean, ctx).map_err(|err| {
                tracing::trace!(field = %name, code = %err.code, "hook rejected value");
                field.fail_with(err.message.clone(), err)
            }),
            None => Ok(clean),
        });

        match result {
            Ok(clean) => {
                field.set_clean_value(clean.clone());
                clean_data.insert(name, clean);
            }
            Err(message) => {
                errors.insert(name, message);
            }
        }
    }

    (clean_data, errors)
}
