//! The `check` management command.
//!
//! Loads schema declaration files and reports the ones that fail to
//! construct, along with a few softer problems in otherwise valid schemas
//! and in the form defaults of the active settings.

use std::path::PathBuf;

use casper_core::{CasperError, Settings};
use casper_forms::{schema_loader, ButtonKind, FormSchema};

use crate::command::ManagementCommand;

/// Checks schema declarations and settings for problems.
pub struct CheckCommand;

/// The result of a single check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "schema.E002").
    pub id: String,
}

/// Severity levels for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// Informational message.
    Info,
    /// A warning that may indicate a problem.
    Warning,
    /// An error that must be resolved.
    Error,
    /// A critical error that prevents the schema from being used.
    Critical,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

const KNOWN_METHODS: [&str; 2] = ["get", "post"];

fn check_settings(settings: &Settings, messages: &mut Vec<CheckMessage>) {
    let method = settings.form.method.to_lowercase();
    if !KNOWN_METHODS.contains(&method.as_str()) {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: format!("Default form method '{}' is not GET or POST", settings.form.method),
            hint: Some("HTML forms only submit with GET or POST".to_string()),
            id: "settings.W001".to_string(),
        });
    }
}

fn check_schema(label: &str, schema: &FormSchema, messages: &mut Vec<CheckMessage>) {
    if schema.fields().next().is_none() {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: format!("{label}: form '{}' declares no fields", schema.name()),
            hint: None,
            id: "schema.W001".to_string(),
        });
    }

    if !schema.buttons().any(|b| b.kind() == ButtonKind::Submit) {
        messages.push(CheckMessage {
            level: CheckLevel::Info,
            msg: format!("{label}: form '{}' has no submit button", schema.name()),
            hint: Some("Declare a SubmitButtonField so renderers can submit it".to_string()),
            id: "schema.I001".to_string(),
        });
    }

    let method = schema.meta().method.as_str();
    if !KNOWN_METHODS.contains(&method) {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: format!("{label}: form method '{method}' is not GET or POST"),
            hint: None,
            id: "schema.W002".to_string(),
        });
    }
}

/// Runs checks against the settings and each schema file.
///
/// Returns a list of check messages identifying potential issues.
pub fn run_checks(settings: &Settings, paths: &[PathBuf]) -> Vec<CheckMessage> {
    let mut messages = Vec::new();
    check_settings(settings, &mut messages);

    for path in paths {
        let label = path.display().to_string();
        match schema_loader::from_file(path) {
            Ok(schema) => check_schema(&label, &schema, &mut messages),
            Err(CasperError::IoError(e)) => messages.push(CheckMessage {
                level: CheckLevel::Critical,
                msg: format!("{label}: cannot be read: {e}"),
                hint: None,
                id: "schema.E001".to_string(),
            }),
            Err(e) => messages.push(CheckMessage {
                level: CheckLevel::Error,
                msg: format!("{label}: {e}"),
                hint: Some("Fix the declaration so the schema can be built".to_string()),
                id: "schema.E002".to_string(),
            }),
        }
    }

    messages
}

impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check that schema declarations construct"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("schema")
                .long("schema")
                .short('s')
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Schema declaration files to check"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), CasperError> {
        let paths: Vec<PathBuf> = matches
            .get_many::<PathBuf>("schema")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let messages = run_checks(settings, &paths);

        if messages.is_empty() {
            tracing::info!("Check identified no issues ({} schema(s))", paths.len());
            return Ok(());
        }

        let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
        let warnings = messages.iter().filter(|m| m.level == CheckLevel::Warning).count();

        for msg in &messages {
            let hint_text = msg
                .hint
                .as_ref()
                .map_or(String::new(), |h| format!("\n\tHINT: {h}"));
            tracing::warn!("{} ({}): {}{}", msg.level, msg.id, msg.msg, hint_text);
        }

        tracing::info!(
            "Check identified {} issue(s) ({} error(s), {} warning(s))",
            messages.len(),
            errors,
            warnings
        );

        if errors > 0 {
            return Err(CasperError::ConfigurationError(format!(
                "Check found {errors} error(s)"
            )));
        }

        Ok(())
    }
}
