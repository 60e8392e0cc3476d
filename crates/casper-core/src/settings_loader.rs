//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CASPER_DEBUG` | `debug` |
//! | `CASPER_LOG_LEVEL` | `log_level` |
//! | `CASPER_FORM_METHOD` | `form.method` |
//! | `CASPER_FORM_URL` | `form.url` |
//! | `CASPER_FORM_STYLE` | `form.style` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use casper_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("casper.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::CasperError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values, including keys
/// nested inside the `[form]` table.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, CasperError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| CasperError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    merge_over_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, CasperError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CasperError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, CasperError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| CasperError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, CasperError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CasperError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// `CASPER_DEBUG` accepts "true"/"1"/"yes" as true; anything else is false.
/// An empty `CASPER_FORM_STYLE` clears the style.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("CASPER_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("CASPER_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("CASPER_FORM_METHOD") {
        settings.form.method = val.to_lowercase();
    }

    if let Some(val) = lookup("CASPER_FORM_URL") {
        settings.form.url = val;
    }

    if let Some(val) = lookup("CASPER_FORM_STYLE") {
        settings.form.style = if val.is_empty() { None } else { Some(val) };
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, kind: &str) -> Result<String, CasperError> {
    std::fs::read_to_string(path).map_err(|e| {
        CasperError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    overrides: serde_json::Value,
    kind: &str,
) -> Result<Settings, CasperError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        CasperError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        CasperError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
pub(crate) fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        // Defaults preserved
        assert_eq!(settings.form.method, "post");
    }

    #[test]
    fn test_from_toml_str_partial_form_table() {
        let toml = r#"
            [form]
            url = "/submit/"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.form.url, "/submit/");
        assert_eq!(settings.form.method, "post");
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
            [extra]
            theme = "dark"
        "#;
        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.extra.get("theme"), Some(&serde_json::json!("dark")));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("debug = ");
        assert!(matches!(result, Err(CasperError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"maybe\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"\n[form]\nmethod = \"get\"").unwrap();
        let settings = from_toml_file(file.path()).unwrap();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.form.method, "get");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/casper.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str() {
        let settings = from_json_str(r#"{"form": {"style": "compact"}}"#).unwrap();
        assert_eq!(settings.form.style.as_deref(), Some("compact"));
        assert_eq!(settings.form.method, "post");
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"debug": false}}"#).unwrap();
        let settings = from_json_file(file.path()).unwrap();
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{").is_err());
    }

    // ── Env overrides ───────────────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CASPER_DEBUG", "no"),
            ("CASPER_LOG_LEVEL", "trace"),
            ("CASPER_FORM_METHOD", "GET"),
            ("CASPER_FORM_URL", "/login/"),
            ("CASPER_FORM_STYLE", "wide"),
        ]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, |k| env.get(k).map(|v| (*v).to_string()));
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "trace");
        assert_eq!(settings.form.method, "get");
        assert_eq!(settings.form.url, "/login/");
        assert_eq!(settings.form.style.as_deref(), Some("wide"));
    }

    #[test]
    fn test_apply_overrides_empty_style_clears() {
        let mut settings = Settings::default();
        settings.form.style = Some("wide".into());
        apply_overrides(&mut settings, |k| {
            (k == "CASPER_FORM_STYLE").then(String::new)
        });
        assert!(settings.form.style.is_none());
    }

    #[test]
    fn test_apply_overrides_nothing_set() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, |_| None);
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": 3});
        let over = serde_json::json!({"a": {"b": 10}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"b": 10, "c": 2}, "d": 3}));
    }

    #[test]
    fn test_toml_to_json_array() {
        let v: toml::Value = toml::from_str("xs = [1, 2]").unwrap();
        assert_eq!(toml_to_json(v), serde_json::json!({"xs": [1, 2]}));
    }
}
