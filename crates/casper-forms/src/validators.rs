//! User-attachable field validators.
//!
//! Validators run after type validation succeeds, in declaration order.
//! Each receives the current clean value and returns the value to carry
//! forward, so a validator may normalize as well as check.

use std::fmt;

use casper_core::{ValidationError, Value};
use regex::Regex;

/// A validator attached to a [`FieldSpec`](crate::fields::FieldSpec).
///
/// # Examples
///
/// ```
/// use casper_forms::validators::{MaxLengthValidator, Validator};
/// use casper_core::Value;
///
/// let v = MaxLengthValidator::new(5);
/// assert!(v.validate(Value::from("hi")).is_ok());
/// assert!(v.validate(Value::from("toolong")).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Checks the value, returning the (possibly transformed) value to keep.
    fn validate(&self, value: Value) -> Result<Value, ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

fn measured_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Rejects strings (or lists) longer than a limit.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    /// The maximum allowed length.
    pub max_length: usize,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator` with the given maximum length.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if let Some(len) = measured_len(&value) {
            if len > self.max_length {
                return Err(ValidationError::new(
                    format!("Length cannot be more than {}", self.max_length),
                    "max_length",
                )
                .with_param("limit_value", self.max_length.to_string()));
            }
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Rejects strings (or lists) shorter than a limit.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    /// The minimum required length.
    pub min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator` with the given minimum length.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if let Some(len) = measured_len(&value) {
            if len < self.min_length {
                return Err(ValidationError::new(
                    format!("Length cannot be less than {}", self.min_length),
                    "min_length",
                )
                .with_param("limit_value", self.min_length.to_string()));
            }
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Rejects numbers above a limit. Non-numeric values pass.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    /// The maximum allowed value.
    pub max_value: f64,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator` with the given maximum.
    pub const fn new(max_value: f64) -> Self {
        Self { max_value }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if numeric(&value).is_some_and(|n| n > self.max_value) {
            return Err(ValidationError::new(
                format!("Value cannot be more than {}", self.max_value),
                "max_value",
            )
            .with_param("limit_value", self.max_value.to_string()));
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}

/// Rejects numbers below a limit. Non-numeric values pass.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    /// The minimum allowed value.
    pub min_value: f64,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator` with the given minimum.
    pub const fn new(min_value: f64) -> Self {
        Self { min_value }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if numeric(&value).is_some_and(|n| n < self.min_value) {
            return Err(ValidationError::new(
                format!("Value cannot be less than {}", self.min_value),
                "min_value",
            )
            .with_param("limit_value", self.min_value.to_string()));
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Requires the textual form of the value to match a regex anywhere.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
}

impl RegexValidator {
    /// Compiles the pattern; fails on invalid regex syntax.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if self.regex.is_match(&value.to_string()) {
            Ok(value)
        } else {
            Err(ValidationError::invalid(self.message.clone()))
        }
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

type ValidatorFn = dyn Fn(Value) -> Result<Value, ValidationError> + Send + Sync;

/// Adapts a closure into a [`Validator`].
///
/// # Examples
///
/// ```
/// use casper_forms::validators::{FnValidator, Validator};
/// use casper_core::Value;
///
/// let upper = FnValidator::new("upper", |v: Value| {
///     Ok(Value::from(v.to_string().to_uppercase()))
/// });
/// assert_eq!(upper.validate(Value::from("ab")).unwrap(), Value::from("AB"));
/// ```
pub struct FnValidator {
    name: String,
    func: Box<ValidatorFn>,
}

impl FnValidator {
    /// Wraps `func` under the given validator name.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Validator for FnValidator {
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        (self.func)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length() {
        let v = MaxLengthValidator::new(3);
        assert!(v.validate(Value::from("abc")).is_ok());
        let err = v.validate(Value::from("abcd")).unwrap_err();
        assert_eq!(err.code, "max_length");
        assert_eq!(err.message, "Length cannot be more than 3");
        assert!(v
            .validate(Value::List(vec![Value::Int(1); 4]))
            .is_err());
        assert!(v.validate(Value::Int(12345)).is_ok());
        assert_eq!(v.name(), "MaxLengthValidator");
    }

    #[test]
    fn test_min_length() {
        let v = MinLengthValidator::new(2);
        assert!(v.validate(Value::from("ab")).is_ok());
        assert_eq!(v.validate(Value::from("a")).unwrap_err().code, "min_length");
    }

    #[test]
    fn test_value_bounds() {
        let max = MaxValueValidator::new(10.0);
        assert!(max.validate(Value::Int(10)).is_ok());
        assert!(max.validate(Value::Float(10.5)).is_err());
        assert!(max.validate(Value::from("99")).is_ok());

        let min = MinValueValidator::new(0.0);
        assert!(min.validate(Value::Int(0)).is_ok());
        assert_eq!(min.validate(Value::Int(-1)).unwrap_err().code, "min_value");
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::new(r"^\d+$", "Digits only").unwrap();
        assert!(v.validate(Value::from("123")).is_ok());
        assert_eq!(v.validate(Value::from("12a")).unwrap_err().message, "Digits only");
        assert!(RegexValidator::new("(", "bad").is_err());
    }

    #[test]
    fn test_fn_validator() {
        let v = FnValidator::new("no_admin", |value: Value| {
            if value.as_str() == Some("admin") {
                Err(ValidationError::new("Reserved name", "reserved"))
            } else {
                Ok(value)
            }
        });
        assert_eq!(v.name(), "no_admin");
        assert!(v.validate(Value::from("alice")).is_ok());
        assert_eq!(v.validate(Value::from("admin")).unwrap_err().code, "reserved");
        assert!(format!("{v:?}").contains("no_admin"));
    }
}
