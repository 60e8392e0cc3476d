//! End-to-end tests for the built-in commands, dispatched through the registry.

use std::path::PathBuf;

use casper_cli::command::CommandRegistry;
use casper_cli::commands::register_builtin_commands;
use casper_core::{CasperError, Settings};

const PROFILE: &str = r#"
name = "Profile"

[[fields]]
name = "handle"
type = "CharField"
max_length = 10

[[fields]]
name = "age"
type = "IntegerField"
required = false

[[fields]]
name = "save"
type = "SubmitButtonField"
"#;

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    registry
}

fn run(args: &[&str]) -> Result<(), CasperError> {
    let registry = registry();
    let matches = registry
        .build_cli()
        .try_get_matches_from(args)
        .expect("arguments should parse");
    registry.execute(&matches, &Settings::default())
}

fn schema_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("profile.toml");
    std::fs::write(&path, PROFILE).unwrap();
    path
}

#[test]
fn test_builtin_commands_registered() {
    assert_eq!(registry().list_commands(), vec!["check", "describe", "validate"]);
}

#[test]
fn test_validate_valid_submission() {
    let dir = tempfile::tempdir().unwrap();
    let schema = schema_file(&dir);
    let schema = schema.to_str().unwrap();
    run(&["casper", "validate", "--schema", schema, "--data", r#"{"handle": "neo", "age": "7"}"#])
        .unwrap();
}

#[test]
fn test_validate_invalid_submission_fails() {
    let dir = tempfile::tempdir().unwrap();
    let schema = schema_file(&dir);
    let data = dir.path().join("data.json");
    std::fs::write(&data, r#"{"handle": "far-too-long-handle"}"#).unwrap();

    let err = run(&[
        "casper",
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        &format!("@{}", data.display()),
    ])
    .unwrap_err();
    assert!(matches!(err, CasperError::ValidationError(_)));
    assert_eq!(err.to_string(), "Validation error: 1 field(s) failed validation");
}

#[test]
fn test_validate_requires_data() {
    let registry = registry();
    assert!(registry
        .build_cli()
        .try_get_matches_from(["casper", "validate", "--schema", "x.toml"])
        .is_err());
}

#[test]
fn test_describe() {
    let dir = tempfile::tempdir().unwrap();
    let schema = schema_file(&dir);
    run(&["casper", "describe", "--schema", schema.to_str().unwrap(), "--indent"]).unwrap();
}

#[test]
fn test_check_multiple_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let good = schema_file(&dir);
    let bad = dir.path().join("bad.toml");
    std::fs::write(
        &bad,
        r#"
        name = "Bad"
        [[fields]]
        name = "nick"
        type = "CharField"
        default = "anon"
        "#,
    )
    .unwrap();

    run(&["casper", "check", "--schema", good.to_str().unwrap()]).unwrap();
    let err = run(&[
        "casper",
        "check",
        "--schema",
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(matches!(err, CasperError::ConfigurationError(_)));
}
