//! Integration tests for schemas declared in TOML and JSON files.

use std::collections::HashMap;

use casper_core::{CasperError, SchemaError, Value};
use casper_forms::form::Form;
use casper_forms::schema_loader;

const REGISTRATION: &str = r##"
name = "RegistrationForm"

[meta]
url = "/register/"
style = "stacked"

[[fields]]
name = "username"
type = "SlugField"
max_length = 30

[[fields]]
name = "email"
type = "EmailField"

[[fields]]
name = "birthday"
type = "DateField"
required = false
min_value = "1900-01-01"

[[fields]]
name = "color"
type = "ColorField"
required = false
default = "#000"

[[fields]]
name = "plan"
type = "RadioField"
choices = [
    { display = "Free", value = "free" },
    { display = "Pro", value = "pro" },
]

[[fields]]
name = "password"
type = "PasswordField"
min_length = 8
must_contain_upper_case = true
custom_error = "Choose a stronger password"

[[fields]]
name = "register"
type = "SubmitButtonField"
label = "Register"
"##;

fn submission(pairs: &[(&str, &str)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
        .collect()
}

#[test]
fn test_loaded_schema_validates_submissions() {
    let schema = schema_loader::from_toml_str(REGISTRATION).unwrap().into_shared();
    assert_eq!(schema.meta().url, "/register/");
    assert_eq!(schema.meta().style.as_deref(), Some("stacked"));

    let mut form = Form::construct(
        schema,
        Some(submission(&[
            ("username", "New User!"),
            ("email", "new@example.com"),
            ("birthday", "1990-04-01"),
            ("plan", "pro"),
            ("password", "Secretpass"),
        ])),
        None,
    );
    assert!(form.is_valid(), "{:?}", form.errors());
    let clean = form.clean_data().unwrap();
    assert_eq!(clean["username"], Value::from("New_User!"));
    assert_eq!(clean["color"], Value::from("#000"));
    assert_eq!(clean["plan"], Value::from("pro"));
    assert_eq!(
        clean["birthday"],
        Value::Date(chrono::NaiveDate::from_ymd_opt(1990, 4, 1).unwrap())
    );
}

#[test]
fn test_loaded_schema_reports_errors() {
    let schema = schema_loader::from_toml_str(REGISTRATION).unwrap().into_shared();
    let form = Form::construct(
        schema,
        Some(submission(&[
            ("username", "ok"),
            ("email", "new@example.com"),
            ("birthday", "1850-01-01"),
            ("plan", "enterprise"),
            ("password", "weakpass"),
        ])),
        None,
    );
    let errors = form.errors().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors["birthday"],
        "Date value cannot be less than 1900-01-01 00:00:00"
    );
    assert_eq!(errors["plan"], "enterprise is not a valid option for this field");
    assert_eq!(errors["password"], "Choose a stronger password");
}

#[test]
fn test_json_and_toml_declarations_agree() {
    let toml = schema_loader::from_toml_str(
        r#"
        name = "Poll"
        [[fields]]
        name = "rating"
        type = "RangeField"
        min_value = 1
        max_value = 5
        step = 1.0
        "#,
    )
    .unwrap();
    let json = schema_loader::from_json_str(
        r#"{"name": "Poll", "fields": [
            {"name": "rating", "type": "RangeField", "min_value": 1, "max_value": 5, "step": 1.0}
        ]}"#,
    )
    .unwrap();
    assert_eq!(toml.as_json(), json.as_json());
}

#[test]
fn test_file_round_trip_through_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registration.toml");
    std::fs::write(&path, REGISTRATION).unwrap();

    let schema = schema_loader::from_file(&path).unwrap().into_shared();
    let json = Form::new(schema).as_json();
    let last = json.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["field_type"], "SubmitButtonField");
    assert_eq!(last["label"], "Register");
}

#[test]
fn test_invalid_declarations() {
    let err = schema_loader::from_toml_str("name = ").unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));

    let err = schema_loader::from_toml_str(
        r#"
        name = "X"
        [[fields]]
        name = "p"
        type = "PasswordField"
        internationalize = true
        "#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnsupportedConstraint {
            field_type: "PasswordField",
            constraint: "internationalize",
        }
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{}").unwrap();
    assert!(matches!(
        schema_loader::from_file(&path),
        Err(CasperError::Schema(SchemaError::Parse(_)))
    ));
}
