//! Type-specific validation and coercion.
//!
//! [`clean_typed_value`] checks a present, non-null value against its
//! [`FieldType`] and returns the typed clean value. Messages and codes here
//! are the ones surfaced to end users unless the field sets a custom error.

use casper_core::{ValidationError, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{Choice, FieldType, PasswordPolicy};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").expect("valid email regex")
});

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("valid color regex"));

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-f0-9]{8}-[a-f0-9]{4}-4[a-f0-9]{3}-[89ab][a-f0-9]{3}-[a-f0-9]{12}$")
        .expect("valid uuid regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:\+?(\d{1,3}))?([-. (]*(\d{3})[-. )]*)?((\d{3})[-. ]*(\d{2,4})(?:[-.x ]*(\d+))?)\s*$",
    )
    .expect("valid phone regex")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((([0]?[1-9]|1[0-2])(:|\.)[0-5][0-9]((:|\.)[0-5][0-9])?( )?(AM|am|aM|Am|PM|pm|pM|Pm))|(([0]?[0-9]|1[0-9]|2[0-3])(:|\.)[0-5][0-9]((:|\.)[0-5][0-9])?))$",
    )
    .expect("valid time regex")
});

/// Characters removed from slugs.
const SLUG_BLACKLIST: &[char] = &[
    '"', '#', '$', '%', '&', '+', ',', '/', ':', ';', '=', '?', '@', '[', '\\', ']', '^', '`',
    '{', '|', '}', '~', '\'',
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const TIME_FORMATS: &[&str] = &["%I:%M:%S%p", "%I:%M%p", "%H:%M:%S", "%H:%M"];

/// Parses a free-form date or date-time string.
///
/// Date-only input resolves to midnight.
pub(crate) fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parses a 12 or 24 hour time string; `.` is accepted as a separator.
pub(crate) fn parse_time(input: &str) -> Option<NaiveTime> {
    let normalized = input.trim().replace('.', ":").to_uppercase().replace(' ', "");
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
}

/// Validates a value against its field type and returns the clean value.
///
/// The value is never `Null`; presence checks happen before this is called.
pub fn clean_typed_value(field_type: &FieldType, value: Value) -> Result<Value, ValidationError> {
    match field_type {
        FieldType::Char {
            min_length,
            max_length,
        }
        | FieldType::Text {
            min_length,
            max_length,
            ..
        } => {
            let s = into_text(value);
            check_length(&s, *min_length, *max_length)?;
            Ok(Value::String(s))
        }
        FieldType::Integer {
            min_value,
            max_value,
            ..
        } => clean_integer(value, *min_value, *max_value),
        FieldType::Float {
            min_value,
            max_value,
            ..
        } => {
            let f = parse_number(value, false)
                .ok_or_else(|| invalid("Invalid numeric value for a float"))?;
            check_range(&f, min_value.as_ref(), max_value.as_ref(), "Value")?;
            Ok(Value::Float(f))
        }
        FieldType::Decimal {
            min_value,
            max_value,
            ..
        } => {
            let f = parse_number(value, true)
                .ok_or_else(|| invalid("Invalid numeric value for a decimal"))?;
            check_range(&f, min_value.as_ref(), max_value.as_ref(), "Value")?;
            Ok(Value::Float(f))
        }
        FieldType::Range {
            min_value,
            max_value,
            ..
        } => clean_range(value, *min_value, *max_value),
        FieldType::Boolean => clean_boolean(&value),
        FieldType::Email => {
            let s = into_text(value);
            if EMAIL_RE.is_match(&s) && email_round_trips(&s) {
                Ok(Value::String(s))
            } else {
                Err(invalid("Invalid email"))
            }
        }
        FieldType::Url => {
            let s = into_text(value);
            if url_round_trips(&s) {
                Ok(Value::String(s))
            } else {
                Err(invalid("Invalid url"))
            }
        }
        FieldType::Uuid => clean_uuid(value),
        FieldType::Slug {
            min_length,
            max_length,
        } => {
            let s = into_text(value);
            check_length(&s, *min_length, *max_length)?;
            Ok(Value::String(slugify(&s)))
        }
        FieldType::Color => {
            let s = into_text(value);
            if COLOR_RE.is_match(&s) {
                Ok(Value::String(s))
            } else {
                Err(invalid("Invalid hex color"))
            }
        }
        FieldType::Date {
            min_value,
            max_value,
        } => clean_date(value, min_value.as_ref(), max_value.as_ref()),
        FieldType::DateTime {
            min_value,
            max_value,
        } => clean_datetime(value, min_value.as_ref(), max_value.as_ref()),
        FieldType::Time {
            min_value,
            max_value,
        } => clean_time(value, min_value.as_ref(), max_value.as_ref()),
        FieldType::Choice { choices, multiple } => clean_choices(value, choices, *multiple),
        FieldType::CheckBox { choices } => clean_choices(value, choices, true),
        FieldType::Radio { choices } | FieldType::DataList { choices } => {
            clean_choices(value, choices, false)
        }
        FieldType::Password {
            min_length,
            max_length,
            policy,
        } => {
            let s = into_text(value);
            check_length(&s, *min_length, *max_length)?;
            check_password_policy(&s, *policy)?;
            Ok(Value::String(s))
        }
        FieldType::Phone { internationalize } => {
            let s = into_text(value);
            if !PHONE_RE.is_match(&s) {
                return Err(invalid("Invalid Phone"));
            }
            if *internationalize && !(s.starts_with('+') || s.starts_with("00")) {
                return Err(ValidationError::new(
                    "Phone must be in international format",
                    "international",
                ));
            }
            Ok(Value::String(s))
        }
        FieldType::File(_) | FieldType::Image { .. } | FieldType::Hidden => Ok(value),
    }
}

fn invalid(message: &str) -> ValidationError {
    ValidationError::invalid(message)
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn check_length(
    s: &str,
    min_length: Option<usize>,
    max_length: Option<usize>,
) -> Result<(), ValidationError> {
    let len = s.chars().count();
    if let Some(max) = max_length {
        if len > max {
            return Err(
                ValidationError::new(format!("Length cannot be more than {max}"), "max_length")
                    .with_param("limit_value", max.to_string())
                    .with_param("show_value", len.to_string()),
            );
        }
    }
    if let Some(min) = min_length {
        if len < min {
            return Err(
                ValidationError::new(format!("Length cannot be less than {min}"), "min_length")
                    .with_param("limit_value", min.to_string())
                    .with_param("show_value", len.to_string()),
            );
        }
    }
    Ok(())
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    value: &T,
    min_value: Option<&T>,
    max_value: Option<&T>,
    subject: &str,
) -> Result<(), ValidationError> {
    if let Some(max) = max_value {
        if value > max {
            return Err(ValidationError::new(
                format!("{subject} cannot be more than {max}"),
                "max_value",
            )
            .with_param("limit_value", max.to_string()));
        }
    }
    if let Some(min) = min_value {
        if value < min {
            return Err(ValidationError::new(
                format!("{subject} cannot be less than {min}"),
                "min_value",
            )
            .with_param("limit_value", min.to_string()));
        }
    }
    Ok(())
}

fn clean_integer(
    value: Value,
    min_value: Option<i64>,
    max_value: Option<i64>,
) -> Result<Value, ValidationError> {
    let n = match value {
        Value::Int(i) if i >= 0 => i,
        other => {
            let s = into_text(other);
            if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("Invalid integer"));
            }
            s.parse::<i64>().map_err(|_| invalid("Invalid integer"))?
        }
    };
    check_range(&n, min_value.as_ref(), max_value.as_ref(), "Value")?;
    Ok(Value::Int(n))
}

#[allow(clippy::cast_precision_loss)]
fn parse_number(value: Value, comma_decimal: bool) -> Option<f64> {
    match value {
        Value::Float(f) => Some(f),
        Value::Int(i) => Some(i as f64),
        other => {
            let s = into_text(other);
            let s = s.trim();
            if comma_decimal {
                s.replace(',', ".").parse().ok()
            } else {
                s.parse().ok()
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn clean_range(
    value: Value,
    min_value: Option<f64>,
    max_value: Option<f64>,
) -> Result<Value, ValidationError> {
    let whole = match &value {
        Value::Int(i) => Some(*i),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let f = match whole {
        Some(i) => i as f64,
        None => parse_number(value, false)
            .ok_or_else(|| invalid("Invalid numeric value for a range"))?,
    };
    check_range(&f, min_value.as_ref(), max_value.as_ref(), "Value")?;
    Ok(whole.map_or(Value::Float(f), Value::Int))
}

fn clean_boolean(value: &Value) -> Result<Value, ValidationError> {
    let b = match value {
        Value::Bool(b) => Some(*b),
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "ok" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    b.map(Value::Bool).ok_or_else(|| invalid("Invalid Boolean"))
}

/// Splits an address into local part and domain and reassembles it,
/// returning `None` for structurally broken addresses.
///
/// Stricter than a plain parse round trip: a local part with a leading,
/// trailing or doubled dot is rejected, as are empty domain labels and
/// labels that start or end with a hyphen.
fn normalize_address(s: &str) -> Option<String> {
    let (local, domain) = s.rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return None;
    }
    if domain
        .split('.')
        .any(|label| label.is_empty() || label.starts_with('-') || label.ends_with('-'))
    {
        return None;
    }
    Some(format!("{local}@{domain}"))
}

fn email_round_trips(s: &str) -> bool {
    normalize_address(s).is_some_and(|normalized| normalized == s)
}

fn url_round_trips(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(parsed) => {
            let serialized = parsed.as_str();
            serialized == s || serialized.strip_suffix('/') == Some(s)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let Ok(base) = url::Url::parse("http://localhost/") else {
                return false;
            };
            let Ok(joined) = base.join(s) else {
                return false;
            };
            if joined.host_str() != Some("localhost") {
                return false;
            }
            let expected = if s.starts_with('/') {
                s.to_string()
            } else {
                format!("/{s}")
            };
            joined.as_str().strip_prefix("http://localhost") == Some(expected.as_str())
        }
        Err(_) => false,
    }
}

fn clean_uuid(value: Value) -> Result<Value, ValidationError> {
    if let Value::Uuid(u) = value {
        return Ok(Value::Uuid(u));
    }
    let s = into_text(value);
    if !UUID_RE.is_match(&s) {
        return Err(invalid("Invalid uuid"));
    }
    uuid::Uuid::parse_str(&s)
        .map(Value::Uuid)
        .map_err(|_| invalid("Invalid uuid"))
}

/// Strips URL-unsafe punctuation and joins whitespace runs with `_`.
fn slugify(s: &str) -> String {
    let stripped: String = s.chars().filter(|c| !SLUG_BLACKLIST.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join("_")
}

fn coerce_datetime(value: Value) -> Result<NaiveDateTime, ValidationError> {
    match value {
        Value::DateTime(dt) => Ok(dt),
        Value::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
        other => parse_datetime(&into_text(other)).ok_or_else(|| invalid("Invalid datetime object")),
    }
}

fn clean_date(
    value: Value,
    min_value: Option<&NaiveDateTime>,
    max_value: Option<&NaiveDateTime>,
) -> Result<Value, ValidationError> {
    let dt = coerce_datetime(value)?;
    check_range(&dt, min_value, max_value, "Date value")?;
    if dt.time() != NaiveTime::MIN {
        return Err(invalid("Value is not a valid date"));
    }
    Ok(Value::Date(dt.date()))
}

fn clean_datetime(
    value: Value,
    min_value: Option<&NaiveDateTime>,
    max_value: Option<&NaiveDateTime>,
) -> Result<Value, ValidationError> {
    let dt = match value {
        Value::DateTime(dt) => dt,
        other => {
            let s = into_text(other);
            if !s.contains(':') {
                return Err(invalid("Value is not a valid datetime"));
            }
            parse_datetime(&s).ok_or_else(|| invalid("Invalid datetime object"))?
        }
    };
    check_range(&dt, min_value, max_value, "Value")?;
    Ok(Value::DateTime(dt))
}

fn clean_time(
    value: Value,
    min_value: Option<&NaiveTime>,
    max_value: Option<&NaiveTime>,
) -> Result<Value, ValidationError> {
    let t = match value {
        Value::Time(t) => t,
        other => {
            let s = into_text(other);
            if !TIME_RE.is_match(&s) {
                return Err(invalid("Value is not a valid time"));
            }
            parse_time(&s).ok_or_else(|| invalid("Invalid datetime object"))?
        }
    };
    check_range(&t, min_value, max_value, "Value")?;
    Ok(Value::Time(t))
}

fn clean_choices(value: Value, choices: &[Choice], multiple: bool) -> Result<Value, ValidationError> {
    let is_option = |entry: &str| choices.iter().any(|c| c.value == entry);
    let reject = |entry: &str| {
        ValidationError::new(
            format!("{entry} is not a valid option for this field"),
            "invalid_choice",
        )
        .with_param("value", entry)
    };

    if !multiple {
        let s = into_text(value);
        return if is_option(&s) {
            Ok(Value::String(s))
        } else {
            Err(reject(&s))
        };
    }

    let entries: Vec<String> = match value {
        Value::List(items) => items.into_iter().map(into_text).collect(),
        other => into_text(other)
            .split(',')
            .map(|part| part.trim().to_string())
            .collect(),
    };
    if let Some(bad) = entries.iter().find(|entry| !is_option(entry)) {
        return Err(reject(bad));
    }
    Ok(Value::List(entries.into_iter().map(Value::String).collect()))
}

fn check_password_policy(s: &str, policy: PasswordPolicy) -> Result<(), ValidationError> {
    let has_number = s.chars().any(char::is_numeric);
    let has_symbol = s.chars().any(|c| !c.is_alphanumeric());
    let has_upper = s.chars().any(char::is_uppercase);
    let has_lower = s.chars().any(char::is_lowercase);

    if policy.must_contain_number && !has_number {
        return Err(ValidationError::new(
            "Password must contain a numeric character",
            "password_number",
        ));
    }
    if policy.must_contain_symbol && !has_symbol {
        return Err(ValidationError::new(
            "Password must contain a symbol",
            "password_symbol",
        ));
    }
    if policy.must_contain_upper_case && !has_upper {
        return Err(ValidationError::new(
            "Password must contain an upper case character",
            "password_upper_case",
        ));
    }
    if policy.must_contain_lower_case && !has_lower {
        return Err(ValidationError::new(
            "Password must contain a lower case character",
            "password_lower_case",
        ));
    }
    Ok(())
}
