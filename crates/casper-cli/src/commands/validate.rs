//! The `validate` management command.
//!
//! Binds a JSON submission to a declared schema, validates it, and prints a
//! report of the form `{"valid": .., "errors": {..}, "clean_data": {..}}`.
//! JSON arguments are given inline, or as `@path` to read them from a file.

use std::sync::Arc;

use casper_core::{CasperError, CasperResult, Settings, ValidationError, Value};
use casper_forms::{Form, FormData, FormSchema};

use crate::command::ManagementCommand;

/// Validates one submission against a declared schema.
pub struct ValidateCommand;

/// Reads a JSON argument: inline text, or `@path` for a file.
pub fn read_json_arg(raw: &str) -> CasperResult<serde_json::Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            CasperError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read {path}: {e}"),
            ))
        })?,
        None => raw.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}

fn to_form_data(json: serde_json::Value) -> CasperResult<FormData> {
    match json {
        serde_json::Value::Object(map) => {
            Ok(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
        }
        _ => Err(CasperError::SerializationError(
            "Initial data must be a JSON object".to_string(),
        )),
    }
}

/// Validates `data` (and optional per-instance `initial` values) against
/// `schema` and returns the report document.
pub fn validate_submission(
    schema: Arc<FormSchema>,
    data: serde_json::Value,
    initial: Option<serde_json::Value>,
) -> CasperResult<serde_json::Value> {
    let mut form = Form::new(schema);
    if let Some(initial) = initial {
        form.set_initial(to_form_data(initial)?);
    }
    form.bind_json(data)?;

    let valid = form.is_valid();
    let errors = serde_json::to_value(form.errors()?)?;
    Ok(serde_json::json!({
        "valid": valid,
        "errors": errors,
        "clean_data": form.clean_data_json()?,
    }))
}

impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate a JSON submission against a schema"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::schema_arg())
            .arg(
                clap::Arg::new("data")
                    .long("data")
                    .short('d')
                    .required(true)
                    .help("Submitted data as a JSON object, or @file"),
            )
            .arg(
                clap::Arg::new("initial")
                    .long("initial")
                    .short('i')
                    .help("Per-instance defaults as a JSON object, or @file"),
            )
    }

    fn handle(&self, matches: &clap::ArgMatches, _settings: &Settings) -> Result<(), CasperError> {
        let schema = super::load_schema(matches)?;
        let data = matches
            .get_one::<String>("data")
            .ok_or_else(|| CasperError::ConfigurationError("--data is required".to_string()))?;
        let data = read_json_arg(data)?;
        let initial = matches
            .get_one::<String>("initial")
            .map(|raw| read_json_arg(raw))
            .transpose()?;

        let report = validate_submission(schema, data, initial)?;
        println!("{}", serde_json::to_string_pretty(&report)?);

        let failed = report["errors"].as_object().map_or(0, serde_json::Map::len);
        if failed > 0 {
            tracing::info!("{failed} field(s) failed validation");
            return Err(ValidationError::invalid(format!(
                "{failed} field(s) failed validation"
            ))
            .into());
        }
        Ok(())
    }
}
