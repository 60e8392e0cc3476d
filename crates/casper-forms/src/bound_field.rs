//! Bound fields: one field's state inside one form instance.
//!
//! A [`BoundField`] pairs a shared [`FieldSpec`] template with the data of a
//! single submission: the bound value, a per-instance default, the clean
//! value, and any error. Templates are never mutated, so two forms built
//! from the same schema cannot see each other's values.
//!
//! [`FieldDescriptor`] is the snapshot handed to renderers.

use std::sync::Arc;

use casper_core::{ValidationError, Value};
use serde::Serialize;

use crate::fields::{Choice, FieldSpec};
use crate::validation::{run_pipeline, surface_message};

/// A form field bound to submission data and validation state.
#[derive(Debug, Clone)]
pub struct BoundField {
    spec: Arc<FieldSpec>,
    data: Option<Value>,
    initial: Option<Value>,
    clean_value: Option<Value>,
    error: Option<String>,
    raw_error: Option<ValidationError>,
}

impl BoundField {
    /// Creates an unbound field from its template.
    pub const fn new(spec: Arc<FieldSpec>) -> Self {
        Self {
            spec,
            data: None,
            initial: None,
            clean_value: None,
            error: None,
            raw_error: None,
        }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// The shared field template.
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Stores submitted data for this field.
    pub fn bind(&mut self, value: Value) {
        self.data = Some(value);
    }

    pub(crate) fn clear_data(&mut self) {
        self.data = None;
    }

    /// Overrides the declared default for this instance only.
    pub fn bind_default(&mut self, value: Value) {
        self.initial = Some(value);
    }

    /// The bound data, if any.
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The per-instance default, falling back to the declared one.
    pub fn default_value(&self) -> Option<&Value> {
        self.initial.as_ref().or_else(|| self.spec.default_value())
    }

    /// The value that validation sees: bound data when present and
    /// non-empty, otherwise the default, otherwise null.
    pub fn effective_value(&self) -> Value {
        self.data
            .as_ref()
            .filter(|v| !v.is_empty())
            .or_else(|| self.default_value())
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Runs the validation pipeline on the effective value.
    ///
    /// On failure the surfaced message (custom error or specific message)
    /// is returned and recorded; the underlying error stays available via
    /// [`raw_error`](Self::raw_error).
    pub fn validate(&mut self) -> Result<Value, String> {
        match run_pipeline(&self.spec, self.effective_value()) {
            Ok(clean) => {
                tracing::trace!(field = %self.name(), "field passed validation");
                self.clean_value = Some(clean.clone());
                self.error = None;
                self.raw_error = None;
                Ok(clean)
            }
            Err(err) => {
                tracing::trace!(field = %self.name(), code = %err.code, "field failed validation");
                let message = surface_message(&self.spec, &err);
                Err(self.fail_with(message, err))
            }
        }
    }

    /// Records a failure with an explicit surfaced message and returns it.
    pub(crate) fn fail_with(&mut self, message: String, err: ValidationError) -> String {
        self.clean_value = None;
        self.error = Some(message.clone());
        self.raw_error = Some(err);
        message
    }

    pub(crate) fn set_clean_value(&mut self, value: Value) {
        self.clean_value = Some(value);
    }

    /// Clears validation results, keeping data and defaults.
    pub(crate) fn reset(&mut self) {
        self.clean_value = None;
        self.error = None;
        self.raw_error = None;
    }

    /// The clean value after a successful validation.
    pub const fn clean_value(&self) -> Option<&Value> {
        self.clean_value.as_ref()
    }

    /// The surfaced error message after a failed validation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The specific failure behind [`error`](Self::error).
    pub const fn raw_error(&self) -> Option<&ValidationError> {
        self.raw_error.as_ref()
    }

    /// Returns `true` if the last validation failed.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name())
    }

    /// Snapshot of everything a renderer needs for this field.
    pub fn descriptor(&self) -> FieldDescriptor {
        let spec = &self.spec;
        let effective = self.effective_value();
        FieldDescriptor {
            name: spec.name().to_string(),
            auto_id: self.auto_id(),
            label: spec.label().to_string(),
            type_tag: spec.type_tag(),
            current_value: (!effective.is_empty()).then(|| effective.to_string()),
            error: self.error.clone(),
            help_text: spec.help_text().map(str::to_string),
            required: spec.required(),
            disabled: spec.disabled(),
            read_only: spec.read_only(),
            pattern: spec.pattern().map(|re| re.as_str().to_string()),
            place_holder: spec.place_holder().map(str::to_string),
            auto_focus: spec.auto_focus(),
            auto_complete: spec.auto_complete(),
            style: spec.style().map(str::to_string),
            choices: spec.field_type().choices().map(<[Choice]>::to_vec),
            multiple: spec.field_type().is_multi_valued(),
        }
    }
}

/// What a renderer needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// The field name (also the input name).
    pub name: String,
    /// The HTML id (`id_<name>`).
    pub auto_id: String,
    /// The label text.
    pub label: String,
    /// The field type tag.
    pub type_tag: &'static str,
    /// The effective value as text, absent when empty.
    pub current_value: Option<String>,
    /// The surfaced error message.
    pub error: Option<String>,
    /// Help text.
    pub help_text: Option<String>,
    /// Required flag.
    pub required: bool,
    /// Disabled flag.
    pub disabled: bool,
    /// Read-only flag.
    pub read_only: bool,
    /// Pattern source.
    pub pattern: Option<String>,
    /// Placeholder text.
    pub place_holder: Option<String>,
    /// Autofocus hint.
    pub auto_focus: bool,
    /// Autocomplete hint.
    pub auto_complete: bool,
    /// Style hint.
    pub style: Option<String>,
    /// Choices for choice-type fields.
    pub choices: Option<Vec<Choice>>,
    /// Whether several values may be submitted.
    pub multiple: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(builder: crate::fields::FieldBuilder, name: &str) -> BoundField {
        BoundField::new(Arc::new(builder.build().unwrap().with_name(name)))
    }

    #[test]
    fn test_effective_value_prefers_data() {
        let mut field = bound(FieldSpec::char().required(false).default("d"), "x");
        assert_eq!(field.effective_value(), Value::from("d"));
        field.bind(Value::from("v"));
        assert_eq!(field.effective_value(), Value::from("v"));
    }

    #[test]
    fn test_effective_value_empty_data_falls_back() {
        let mut field = bound(FieldSpec::char().required(false).default("d"), "x");
        field.bind(Value::from(""));
        assert_eq!(field.effective_value(), Value::from("d"));
    }

    #[test]
    fn test_effective_value_null_without_default() {
        let field = bound(FieldSpec::char(), "x");
        assert_eq!(field.effective_value(), Value::Null);
    }

    #[test]
    fn test_bind_default_overrides_declared() {
        let mut field = bound(FieldSpec::char().required(false).default("d"), "x");
        field.bind_default(Value::from("i"));
        assert_eq!(field.effective_value(), Value::from("i"));
        assert_eq!(field.spec().default_value(), Some(&Value::from("d")));
    }

    #[test]
    fn test_validate_records_state() {
        let mut field = bound(FieldSpec::integer(), "age");
        field.bind(Value::from("abc"));
        assert_eq!(field.validate().unwrap_err(), "Invalid integer");
        assert!(field.has_error());
        assert!(field.clean_value().is_none());

        field.bind(Value::from("12"));
        assert_eq!(field.validate().unwrap(), Value::Int(12));
        assert!(!field.has_error());
        assert_eq!(field.clean_value(), Some(&Value::Int(12)));
    }

    #[test]
    fn test_custom_error_keeps_raw_error() {
        let mut field = bound(FieldSpec::integer().custom_error("Age please"), "age");
        field.bind(Value::from("abc"));
        assert_eq!(field.validate().unwrap_err(), "Age please");
        assert_eq!(field.error(), Some("Age please"));
        assert_eq!(field.raw_error().unwrap().message, "Invalid integer");
    }

    #[test]
    fn test_reset() {
        let mut field = bound(FieldSpec::integer(), "age");
        field.bind(Value::from("x"));
        let _ = field.validate();
        field.reset();
        assert!(!field.has_error());
        assert_eq!(field.data(), Some(&Value::from("x")));
    }

    #[test]
    fn test_descriptor() {
        let mut field = bound(
            FieldSpec::choice(["a", "b"])
                .label("Letter")
                .help_text("Pick one")
                .place_holder("..."),
            "letter",
        );
        field.bind(Value::from("z"));
        let _ = field.validate();
        let d = field.descriptor();
        assert_eq!(d.name, "letter");
        assert_eq!(d.auto_id, "id_letter");
        assert_eq!(d.label, "Letter");
        assert_eq!(d.type_tag, "ChoiceField");
        assert_eq!(d.current_value.as_deref(), Some("z"));
        assert_eq!(d.error.as_deref(), Some("z is not a valid option for this field"));
        assert_eq!(d.help_text.as_deref(), Some("Pick one"));
        assert_eq!(d.choices.as_ref().map(Vec::len), Some(2));
        assert!(!d.multiple);
    }

    #[test]
    fn test_descriptor_empty_value() {
        let field = bound(FieldSpec::char(), "x");
        assert!(field.descriptor().current_value.is_none());
    }
}
