//! Declaring schemas from TOML or JSON files.
//!
//! ## Format
//!
//! ```toml
//! name = "ContactForm"
//!
//! [meta]
//! method = "post"
//! url = "/contact/"
//!
//! [[fields]]
//! name = "email"
//! type = "EmailField"
//! label = "Your email"
//!
//! [[fields]]
//! name = "topic"
//! type = "ChoiceField"
//! choices = ["sales", { display = "Support", value = "support" }]
//!
//! [[fields]]
//! name = "send"
//! type = "SubmitButtonField"
//! label = "Send"
//! ```
//!
//! Every key maps to the builder setter of the same name. A key that does
//! not apply to the field type is a [`SchemaError`], exactly as with the
//! builder API.

use std::path::Path;

use casper_core::{CasperError, SchemaError, Value};
use serde::Deserialize;

use crate::fields::{Choice, FieldBuilder};
use crate::schema::{ButtonKind, ButtonSpec, FormSchema, SchemaBuilder};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDecl {
    name: String,
    #[serde(default)]
    meta: MetaDecl,
    #[serde(default)]
    fields: Vec<FieldDecl>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetaDecl {
    method: Option<String>,
    url: Option<String>,
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChoiceDecl {
    Plain(String),
    Pair { display: String, value: String },
}

impl From<ChoiceDecl> for Choice {
    fn from(decl: ChoiceDecl) -> Self {
        match decl {
            ChoiceDecl::Plain(value) => Self::from(value),
            ChoiceDecl::Pair { display, value } => Self::new(display, value),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    label: Option<String>,
    style: Option<String>,
    required: Option<bool>,
    allow_null: Option<bool>,
    allow_blank: Option<bool>,
    read_only: Option<bool>,
    disabled: Option<bool>,
    default: Option<serde_json::Value>,
    pattern: Option<String>,
    place_holder: Option<String>,
    custom_error: Option<String>,
    help_text: Option<String>,
    auto_focus: Option<bool>,
    auto_complete: Option<bool>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_value: Option<serde_json::Value>,
    max_value: Option<serde_json::Value>,
    step: Option<f64>,
    choices: Option<Vec<ChoiceDecl>>,
    multiple: Option<bool>,
    must_contain_number: Option<bool>,
    must_contain_symbol: Option<bool>,
    must_contain_upper_case: Option<bool>,
    must_contain_lower_case: Option<bool>,
    internationalize: Option<bool>,
    rows: Option<u32>,
    cols: Option<u32>,
    min_size: Option<u64>,
    max_size: Option<u64>,
    file_type: Option<String>,
    src: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

macro_rules! apply {
    ($builder:ident, $decl:ident, $($key:ident),+ $(,)?) => {
        $(
            if let Some(v) = $decl.$key {
                $builder = $builder.$key(v);
            }
        )+
    };
}

impl FieldDecl {
    fn into_button(self, kind: ButtonKind) -> ButtonSpec {
        let mut button = ButtonSpec::new(kind);
        if let Some(label) = self.label {
            button = button.label(label);
        }
        if let Some(style) = self.style {
            button = button.style(style);
        }
        button
    }

    fn into_builder(self) -> Result<FieldBuilder, SchemaError> {
        let mut builder = FieldBuilder::from_tag(&self.field_type)?;
        let decl = self;
        apply!(
            builder,
            decl,
            label,
            style,
            required,
            allow_null,
            allow_blank,
            read_only,
            disabled,
            pattern,
            place_holder,
            custom_error,
            help_text,
            auto_focus,
            auto_complete,
            min_length,
            max_length,
            step,
            multiple,
            must_contain_number,
            must_contain_symbol,
            must_contain_upper_case,
            must_contain_lower_case,
            internationalize,
            rows,
            cols,
            min_size,
            max_size,
            file_type,
            src,
            width,
            height,
        );
        if let Some(default) = decl.default {
            builder = builder.default(Value::from(default));
        }
        if let Some(min) = decl.min_value {
            builder = builder.min_value(Value::from(min));
        }
        if let Some(max) = decl.max_value {
            builder = builder.max_value(Value::from(max));
        }
        if let Some(choices) = decl.choices {
            builder = builder.choices(choices.into_iter().map(Choice::from));
        }
        Ok(builder)
    }
}

fn assemble(decl: SchemaDecl) -> Result<FormSchema, SchemaError> {
    let mut builder = SchemaBuilder::new(decl.name);
    if let Some(method) = decl.meta.method {
        builder = builder.method(method);
    }
    if let Some(url) = decl.meta.url {
        builder = builder.url(url);
    }
    if let Some(style) = decl.meta.style {
        builder = builder.style(style);
    }

    for field in decl.fields {
        let name = field.name.clone();
        builder = match ButtonKind::from_tag(&field.field_type) {
            Some(kind) => builder.button(name, field.into_button(kind)),
            None => builder.field(name, field.into_builder()?),
        };
    }
    builder.build()
}

/// Declares a schema from a TOML document.
pub fn from_toml_str(source: &str) -> Result<FormSchema, SchemaError> {
    let decl: SchemaDecl =
        toml::from_str(source).map_err(|e| SchemaError::Parse(format!("TOML: {e}")))?;
    assemble(decl)
}

/// Declares a schema from a JSON document.
pub fn from_json_str(source: &str) -> Result<FormSchema, SchemaError> {
    let decl: SchemaDecl =
        serde_json::from_str(source).map_err(|e| SchemaError::Parse(format!("JSON: {e}")))?;
    assemble(decl)
}

/// Declares a schema from a file, picking the format by extension
/// (`.json` is JSON, anything else is TOML).
pub fn from_file(path: impl AsRef<Path>) -> Result<FormSchema, CasperError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    tracing::debug!(path = %path.display(), json = is_json, "loading form schema");
    let schema = if is_json {
        from_json_str(&source)?
    } else {
        from_toml_str(&source)?
    };
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;

    const CONTACT: &str = r#"
        name = "ContactForm"

        [meta]
        method = "GET"
        url = "/contact/"

        [[fields]]
        name = "email"
        type = "EmailField"
        label = "Your email"

        [[fields]]
        name = "age"
        type = "IntegerField"
        required = false
        min_value = 18
        max_value = 120

        [[fields]]
        name = "topic"
        type = "ChoiceField"
        choices = ["sales", { display = "Support", value = "support" }]

        [[fields]]
        name = "send"
        type = "SubmitButtonField"
        label = "Send"
    "#;

    #[test]
    fn test_from_toml_str() {
        let schema = from_toml_str(CONTACT).unwrap();
        assert_eq!(schema.name(), "ContactForm");
        assert_eq!(schema.meta().method, "get");
        assert_eq!(schema.meta().url, "/contact/");
        assert_eq!(schema.field_names(), vec!["email", "age", "topic"]);
        assert_eq!(schema.entries().len(), 4);
        assert_eq!(schema.field("email").unwrap().label(), "Your email");
        assert_eq!(
            schema.field("age").unwrap().field_type(),
            &FieldType::Integer {
                min_value: Some(18),
                max_value: Some(120),
                step: None,
            }
        );
        let choices = schema.field("topic").unwrap().field_type().choices().unwrap();
        assert_eq!(choices[0], Choice::new("sales", "sales"));
        assert_eq!(choices[1], Choice::new("Support", "support"));
    }

    #[test]
    fn test_from_json_str() {
        let schema = from_json_str(
            r#"{"name": "Login", "fields": [
                {"name": "user", "type": "CharField", "max_length": 20},
                {"name": "password", "type": "PasswordField", "must_contain_number": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schema.field_names(), vec!["user", "password"]);
        assert_eq!(schema.meta().method, "post");
    }

    #[test]
    fn test_unknown_type() {
        let err = from_json_str(r#"{"name": "X", "fields": [{"name": "a", "type": "Bogus"}]}"#)
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownFieldType("Bogus".into()));
    }

    #[test]
    fn test_unsupported_key_for_type() {
        let err = from_json_str(
            r#"{"name": "X", "fields": [{"name": "a", "type": "BooleanField", "max_length": 3}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedConstraint { .. }));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = from_json_str(
            r#"{"name": "X", "fields": [{"name": "a", "type": "CharField", "colour": "red"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn test_required_with_default_from_file_format() {
        let err = from_toml_str(
            r#"
            name = "X"
            [[fields]]
            name = "a"
            type = "CharField"
            default = "x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::RequiredWithDefault { .. }));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("contact.toml");
        std::fs::write(&toml_path, CONTACT).unwrap();
        assert_eq!(from_file(&toml_path).unwrap().name(), "ContactForm");

        let json_path = dir.path().join("login.json");
        std::fs::write(&json_path, r#"{"name": "Login"}"#).unwrap();
        assert_eq!(from_file(&json_path).unwrap().name(), "Login");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            from_file("/nonexistent/form.toml"),
            Err(CasperError::IoError(_))
        ));
    }
}
