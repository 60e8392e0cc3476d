//! Form field definitions.
//!
//! Each [`FieldSpec`] describes a single form field: its [`FieldType`]
//! (which carries the type-specific constraints), the general constraints
//! shared by every field, and rendering hints. Specs are built through a
//! [`FieldBuilder`] whose [`build`](FieldBuilder::build) step is the only way
//! to obtain a spec, so every declaration invariant is checked up front.
//!
//! A spec is a template. It never holds submission state; see
//! [`BoundField`](crate::bound_field::BoundField) for that.

use std::fmt;

use casper_core::{SchemaError, Value};
use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::type_validators::{parse_datetime, parse_time};
use crate::validators::Validator;

/// One entry of a choice-type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the user.
    pub display: String,
    /// Value submitted when this choice is picked.
    pub value: String,
}

impl Choice {
    /// Creates a choice with distinct display text and value.
    pub fn new(display: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            value: value.into(),
        }
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

impl From<String> for Choice {
    fn from(value: String) -> Self {
        Self::new(value.clone(), value)
    }
}

impl From<(&str, &str)> for Choice {
    fn from((display, value): (&str, &str)) -> Self {
        Self::new(display, value)
    }
}

/// Character-class requirements for password fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// At least one numeric character.
    pub must_contain_number: bool,
    /// At least one non-alphanumeric character.
    pub must_contain_symbol: bool,
    /// At least one upper case character.
    pub must_contain_upper_case: bool,
    /// At least one lower case character.
    pub must_contain_lower_case: bool,
}

/// Declared constraints for uploads.
///
/// These are exposed to renderers and storage collaborators; the validation
/// pipeline does not inspect file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConstraints {
    /// Minimum size in bytes.
    pub min_size: Option<u64>,
    /// Maximum size in bytes.
    pub max_size: Option<u64>,
    /// Accepted MIME type pattern (e.g. `image/*`).
    pub file_type: Option<String>,
    /// Source URL of an existing upload.
    pub src: Option<String>,
}

/// The type of a form field, including type-specific parameters.
///
/// This is a closed set: validation dispatches with a `match` on this enum
/// (see [`clean_typed_value`](crate::type_validators::clean_typed_value)).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A single-line text field.
    Char {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// A multi-line text field.
    Text {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
        /// Visible rows.
        rows: Option<u32>,
        /// Visible columns.
        cols: Option<u32>,
    },
    /// An unsigned whole-number field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
        /// Step hint for renderers.
        step: Option<f64>,
    },
    /// A floating-point field.
    Float {
        /// Minimum allowed value.
        min_value: Option<f64>,
        /// Maximum allowed value.
        max_value: Option<f64>,
        /// Step hint for renderers.
        step: Option<f64>,
    },
    /// A decimal field; accepts `,` as the decimal separator.
    Decimal {
        /// Minimum allowed value.
        min_value: Option<f64>,
        /// Maximum allowed value.
        max_value: Option<f64>,
        /// Step hint for renderers.
        step: Option<f64>,
    },
    /// A slider-style numeric field.
    Range {
        /// Minimum allowed value.
        min_value: Option<f64>,
        /// Maximum allowed value.
        max_value: Option<f64>,
        /// Step hint for renderers.
        step: Option<f64>,
    },
    /// A boolean field.
    Boolean,
    /// An email address field.
    Email,
    /// A URL field.
    Url,
    /// A version 4 UUID field.
    Uuid,
    /// A slug field; the clean value has URL-unsafe punctuation stripped.
    Slug {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// A hex color field (`#abc` or `#aabbcc`).
    Color,
    /// A date-only field.
    Date {
        /// Earliest allowed date.
        min_value: Option<NaiveDateTime>,
        /// Latest allowed date.
        max_value: Option<NaiveDateTime>,
    },
    /// A date and time field.
    DateTime {
        /// Earliest allowed moment.
        min_value: Option<NaiveDateTime>,
        /// Latest allowed moment.
        max_value: Option<NaiveDateTime>,
    },
    /// A time-of-day field (12 or 24 hour input).
    Time {
        /// Earliest allowed time.
        min_value: Option<NaiveTime>,
        /// Latest allowed time.
        max_value: Option<NaiveTime>,
    },
    /// A select field, optionally multi-select.
    Choice {
        /// Available choices, in display order.
        choices: Vec<Choice>,
        /// Whether several values may be picked.
        multiple: bool,
    },
    /// A group of checkboxes; always multi-valued.
    CheckBox {
        /// Available choices, in display order.
        choices: Vec<Choice>,
    },
    /// A group of radio buttons.
    Radio {
        /// Available choices, in display order.
        choices: Vec<Choice>,
    },
    /// A free-text input with suggested values.
    DataList {
        /// Available choices, in display order.
        choices: Vec<Choice>,
    },
    /// A password field with optional complexity policy.
    Password {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
        /// Required character classes.
        policy: PasswordPolicy,
    },
    /// A phone number field.
    Phone {
        /// Whether the number must start with `+` or `00`.
        internationalize: bool,
    },
    /// A file upload.
    File(FileConstraints),
    /// An image upload.
    Image {
        /// Upload constraints; `file_type` defaults to `image/*`.
        file: FileConstraints,
        /// Expected width in pixels.
        width: Option<u32>,
        /// Expected height in pixels.
        height: Option<u32>,
    },
    /// A hidden field; passed through unchanged.
    Hidden,
}

impl FieldType {
    /// Returns the type tag exposed to renderers and JSON clients.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Char { .. } => "CharField",
            Self::Text { .. } => "TextField",
            Self::Integer { .. } => "IntegerField",
            Self::Float { .. } => "FloatField",
            Self::Decimal { .. } => "DecimalField",
            Self::Range { .. } => "RangeField",
            Self::Boolean => "BooleanField",
            Self::Email => "EmailField",
            Self::Url => "UrlField",
            Self::Uuid => "UuidField",
            Self::Slug { .. } => "SlugField",
            Self::Color => "ColorField",
            Self::Date { .. } => "DateField",
            Self::DateTime { .. } => "DateTimeField",
            Self::Time { .. } => "TimeField",
            Self::Choice { .. } => "ChoiceField",
            Self::CheckBox { .. } => "CheckBoxField",
            Self::Radio { .. } => "RadioField",
            Self::DataList { .. } => "DataListField",
            Self::Password { .. } => "PasswordField",
            Self::Phone { .. } => "PhoneField",
            Self::File(_) => "FileField",
            Self::Image { .. } => "ImageField",
            Self::Hidden => "HiddenField",
        }
    }

    /// Returns the declared choices for choice-type fields.
    pub fn choices(&self) -> Option<&[Choice]> {
        match self {
            Self::Choice { choices, .. }
            | Self::CheckBox { choices }
            | Self::Radio { choices }
            | Self::DataList { choices } => Some(choices),
            _ => None,
        }
    }

    /// Returns `true` for field types whose clean value is a list.
    pub const fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Self::Choice { multiple: true, .. } | Self::CheckBox { .. }
        )
    }

    /// Writes the type-specific constraints into a JSON object.
    fn write_constraints(&self, out: &mut serde_json::Map<String, serde_json::Value>) {
        use serde_json::json;

        match self {
            Self::Char {
                min_length,
                max_length,
            }
            | Self::Slug {
                min_length,
                max_length,
            } => {
                out.insert("max_length".into(), json!(max_length));
                out.insert("min_length".into(), json!(min_length));
            }
            Self::Text {
                min_length,
                max_length,
                rows,
                cols,
            } => {
                out.insert("max_length".into(), json!(max_length));
                out.insert("min_length".into(), json!(min_length));
                out.insert("rows".into(), json!(rows));
                out.insert("cols".into(), json!(cols));
            }
            Self::Integer {
                min_value,
                max_value,
                step,
            } => {
                out.insert("max_value".into(), json!(max_value));
                out.insert("min_value".into(), json!(min_value));
                out.insert("step".into(), json!(step));
            }
            Self::Float {
                min_value,
                max_value,
                step,
            }
            | Self::Decimal {
                min_value,
                max_value,
                step,
            }
            | Self::Range {
                min_value,
                max_value,
                step,
            } => {
                out.insert("max_value".into(), json!(max_value));
                out.insert("min_value".into(), json!(min_value));
                out.insert("step".into(), json!(step));
            }
            Self::Date {
                min_value,
                max_value,
            }
            | Self::DateTime {
                min_value,
                max_value,
            } => {
                out.insert("max_value".into(), json!(max_value.map(|v| v.to_string())));
                out.insert("min_value".into(), json!(min_value.map(|v| v.to_string())));
            }
            Self::Time {
                min_value,
                max_value,
            } => {
                out.insert("max_value".into(), json!(max_value.map(|v| v.to_string())));
                out.insert("min_value".into(), json!(min_value.map(|v| v.to_string())));
            }
            Self::Choice { choices, multiple } => {
                out.insert("choices".into(), json!(choices));
                out.insert("multiple".into(), json!(multiple));
            }
            Self::CheckBox { choices } | Self::Radio { choices } | Self::DataList { choices } => {
                out.insert("choices".into(), json!(choices));
            }
            Self::Password {
                min_length,
                max_length,
                policy,
            } => {
                out.insert("max_length".into(), json!(max_length));
                out.insert("min_length".into(), json!(min_length));
                out.insert("must_contain_number".into(), json!(policy.must_contain_number));
                out.insert("must_contain_symbol".into(), json!(policy.must_contain_symbol));
                out.insert(
                    "must_contain_upper_case".into(),
                    json!(policy.must_contain_upper_case),
                );
                out.insert(
                    "must_contain_lower_case".into(),
                    json!(policy.must_contain_lower_case),
                );
            }
            Self::Phone { internationalize } => {
                out.insert("internationalize".into(), json!(internationalize));
            }
            Self::File(file) => write_file_constraints(file, out),
            Self::Image {
                file,
                width,
                height,
            } => {
                write_file_constraints(file, out);
                out.insert("width".into(), json!(width));
                out.insert("height".into(), json!(height));
            }
            Self::Boolean
            | Self::Email
            | Self::Url
            | Self::Uuid
            | Self::Color
            | Self::Hidden => {}
        }
    }
}

fn write_file_constraints(
    file: &FileConstraints,
    out: &mut serde_json::Map<String, serde_json::Value>,
) {
    use serde_json::json;
    out.insert("min_size".into(), json!(file.min_size));
    out.insert("max_size".into(), json!(file.max_size));
    out.insert("file_type".into(), json!(file.file_type));
    out.insert("src".into(), json!(file.src));
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Complete, immutable definition of a form field.
///
/// Obtained from [`FieldBuilder::build`]. The name is assigned exactly once,
/// by the schema, when the spec is declared.
#[derive(Debug)]
pub struct FieldSpec {
    name: String,
    label: Option<String>,
    field_type: FieldType,
    required: bool,
    allow_null: bool,
    allow_blank: bool,
    read_only: bool,
    disabled: bool,
    default: Option<Value>,
    pattern: Option<Regex>,
    place_holder: Option<String>,
    custom_error: Option<String>,
    help_text: Option<String>,
    style: Option<String>,
    auto_focus: bool,
    auto_complete: bool,
    validators: Vec<Box<dyn Validator>>,
}

impl FieldSpec {
    /// Starts a builder for an arbitrary field type.
    pub fn builder(field_type: FieldType) -> FieldBuilder {
        FieldBuilder::new(field_type)
    }

    /// Starts a `CharField` builder.
    pub fn char() -> FieldBuilder {
        FieldBuilder::new(FieldType::Char {
            min_length: None,
            max_length: None,
        })
    }

    /// Starts a `TextField` builder.
    pub fn text() -> FieldBuilder {
        FieldBuilder::new(FieldType::Text {
            min_length: None,
            max_length: None,
            rows: None,
            cols: None,
        })
    }

    /// Starts an `IntegerField` builder.
    pub fn integer() -> FieldBuilder {
        FieldBuilder::new(FieldType::Integer {
            min_value: None,
            max_value: None,
            step: None,
        })
    }

    /// Starts a `FloatField` builder.
    pub fn float() -> FieldBuilder {
        FieldBuilder::new(FieldType::Float {
            min_value: None,
            max_value: None,
            step: None,
        })
    }

    /// Starts a `DecimalField` builder.
    pub fn decimal() -> FieldBuilder {
        FieldBuilder::new(FieldType::Decimal {
            min_value: None,
            max_value: None,
            step: None,
        })
    }

    /// Starts a `RangeField` builder.
    pub fn range() -> FieldBuilder {
        FieldBuilder::new(FieldType::Range {
            min_value: None,
            max_value: None,
            step: None,
        })
    }

    /// Starts a `BooleanField` builder.
    pub fn boolean() -> FieldBuilder {
        FieldBuilder::new(FieldType::Boolean)
    }

    /// Starts an `EmailField` builder.
    pub fn email() -> FieldBuilder {
        FieldBuilder::new(FieldType::Email)
    }

    /// Starts a `UrlField` builder.
    pub fn url() -> FieldBuilder {
        FieldBuilder::new(FieldType::Url)
    }

    /// Starts a `UuidField` builder.
    pub fn uuid() -> FieldBuilder {
        FieldBuilder::new(FieldType::Uuid)
    }

    /// Starts a `SlugField` builder.
    pub fn slug() -> FieldBuilder {
        FieldBuilder::new(FieldType::Slug {
            min_length: None,
            max_length: None,
        })
    }

    /// Starts a `ColorField` builder.
    pub fn color() -> FieldBuilder {
        FieldBuilder::new(FieldType::Color)
    }

    /// Starts a `DateField` builder.
    pub fn date() -> FieldBuilder {
        FieldBuilder::new(FieldType::Date {
            min_value: None,
            max_value: None,
        })
    }

    /// Starts a `DateTimeField` builder.
    pub fn date_time() -> FieldBuilder {
        FieldBuilder::new(FieldType::DateTime {
            min_value: None,
            max_value: None,
        })
    }

    /// Starts a `TimeField` builder.
    pub fn time() -> FieldBuilder {
        FieldBuilder::new(FieldType::Time {
            min_value: None,
            max_value: None,
        })
    }

    /// Starts a single-select `ChoiceField` builder.
    pub fn choice<C: Into<Choice>>(choices: impl IntoIterator<Item = C>) -> FieldBuilder {
        FieldBuilder::new(FieldType::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
            multiple: false,
        })
    }

    /// Starts a `CheckBoxField` builder.
    pub fn check_box<C: Into<Choice>>(choices: impl IntoIterator<Item = C>) -> FieldBuilder {
        FieldBuilder::new(FieldType::CheckBox {
            choices: choices.into_iter().map(Into::into).collect(),
        })
    }

    /// Starts a `RadioField` builder.
    pub fn radio<C: Into<Choice>>(choices: impl IntoIterator<Item = C>) -> FieldBuilder {
        FieldBuilder::new(FieldType::Radio {
            choices: choices.into_iter().map(Into::into).collect(),
        })
    }

    /// Starts a `DataListField` builder.
    pub fn data_list<C: Into<Choice>>(choices: impl IntoIterator<Item = C>) -> FieldBuilder {
        FieldBuilder::new(FieldType::DataList {
            choices: choices.into_iter().map(Into::into).collect(),
        })
    }

    /// Starts a `PasswordField` builder.
    pub fn password() -> FieldBuilder {
        FieldBuilder::new(FieldType::Password {
            min_length: None,
            max_length: None,
            policy: PasswordPolicy::default(),
        })
    }

    /// Starts a `PhoneField` builder.
    pub fn phone() -> FieldBuilder {
        FieldBuilder::new(FieldType::Phone {
            internationalize: false,
        })
    }

    /// Starts a `FileField` builder.
    pub fn file() -> FieldBuilder {
        FieldBuilder::new(FieldType::File(FileConstraints::default()))
    }

    /// Starts an `ImageField` builder.
    pub fn image() -> FieldBuilder {
        FieldBuilder::new(FieldType::Image {
            file: FileConstraints {
                file_type: Some("image/*".to_string()),
                ..FileConstraints::default()
            },
            width: None,
            height: None,
        })
    }

    /// Starts a `HiddenField` builder.
    pub fn hidden() -> FieldBuilder {
        FieldBuilder::new(FieldType::Hidden)
    }

    /// Assigns the declared name. Only the schema builder calls this.
    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The name the field was declared under; empty until declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable label; defaults to the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// The field type and its type-specific constraints.
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Shorthand for `field_type().tag()`.
    pub const fn type_tag(&self) -> &'static str {
        self.field_type.tag()
    }

    /// Whether an empty value is an error.
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Whether a null value is accepted.
    pub const fn allow_null(&self) -> bool {
        self.allow_null
    }

    /// Whether an empty value is accepted.
    pub const fn allow_blank(&self) -> bool {
        self.allow_blank
    }

    /// Rendering-only read-only flag.
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// Rendering-only disabled flag.
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// The declared default value.
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The compiled pattern gate, if any.
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The placeholder text.
    pub fn place_holder(&self) -> Option<&str> {
        self.place_holder.as_deref()
    }

    /// The message surfaced instead of the specific failure message.
    pub fn custom_error(&self) -> Option<&str> {
        self.custom_error.as_deref()
    }

    /// Help text displayed alongside the field.
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// Style hint passed through to renderers.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Rendering hint: focus this field on load.
    pub const fn auto_focus(&self) -> bool {
        self.auto_focus
    }

    /// Rendering hint: allow browser autocomplete.
    pub const fn auto_complete(&self) -> bool {
        self.auto_complete
    }

    /// User-supplied validators, in declaration order.
    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }

    /// Describes the field for JSON clients. Values are never included.
    pub fn as_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut out = serde_json::Map::new();
        out.insert("field_type".into(), json!(self.type_tag()));
        out.insert("field_name".into(), json!(self.name));
        out.insert("label".into(), json!(self.label()));
        out.insert("style".into(), json!(self.style));
        out.insert("required".into(), json!(self.required));
        out.insert("allow_blank".into(), json!(self.allow_blank));
        out.insert("allow_null".into(), json!(self.allow_null));
        out.insert("read_only".into(), json!(self.read_only));
        out.insert("disabled".into(), json!(self.disabled));
        out.insert(
            "pattern".into(),
            json!(self.pattern.as_ref().map(Regex::as_str)),
        );
        out.insert("place_holder".into(), json!(self.place_holder));
        out.insert("help_text".into(), json!(self.help_text));
        out.insert("custom_error".into(), json!(self.custom_error));
        out.insert("auto_focus".into(), json!(self.auto_focus));
        out.insert("auto_complete".into(), json!(self.auto_complete));
        self.field_type.write_constraints(&mut out);
        serde_json::Value::Object(out)
    }
}

/// Builder for [`FieldSpec`].
///
/// Setters never fail; [`build`](Self::build) reports the first problem.
/// A constraint set on a type that does not support it is an error rather
/// than being silently ignored.
#[derive(Debug)]
pub struct FieldBuilder {
    field_type: FieldType,
    label: Option<String>,
    required: bool,
    allow_null: bool,
    allow_blank: bool,
    read_only: bool,
    disabled: bool,
    default: Option<Value>,
    pattern: Option<String>,
    place_holder: Option<String>,
    custom_error: Option<String>,
    help_text: Option<String>,
    style: Option<String>,
    auto_focus: bool,
    auto_complete: bool,
    validators: Vec<Box<dyn Validator>>,
    min_value: Option<Value>,
    max_value: Option<Value>,
    unsupported: Option<&'static str>,
}

impl FieldBuilder {
    /// Creates a builder with the usual defaults: required, null and blank
    /// allowed, nothing read-only or disabled.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            label: None,
            required: true,
            allow_null: true,
            allow_blank: true,
            read_only: false,
            disabled: false,
            default: None,
            pattern: None,
            place_holder: None,
            custom_error: None,
            help_text: None,
            style: None,
            auto_focus: false,
            auto_complete: false,
            validators: Vec::new(),
            min_value: None,
            max_value: None,
            unsupported: None,
        }
    }

    /// Creates a builder from a type tag such as `"IntegerField"`.
    ///
    /// Choice-type fields start with no choices; add them with
    /// [`choices`](Self::choices).
    pub fn from_tag(tag: &str) -> Result<Self, SchemaError> {
        let builder = match tag {
            "CharField" => FieldSpec::char(),
            "TextField" => FieldSpec::text(),
            "IntegerField" => FieldSpec::integer(),
            "FloatField" => FieldSpec::float(),
            "DecimalField" => FieldSpec::decimal(),
            "RangeField" => FieldSpec::range(),
            "BooleanField" => FieldSpec::boolean(),
            "EmailField" => FieldSpec::email(),
            "UrlField" => FieldSpec::url(),
            "UuidField" => FieldSpec::uuid(),
            "SlugField" => FieldSpec::slug(),
            "ColorField" => FieldSpec::color(),
            "DateField" => FieldSpec::date(),
            "DateTimeField" => FieldSpec::date_time(),
            "TimeField" => FieldSpec::time(),
            "ChoiceField" => FieldSpec::choice(Vec::<Choice>::new()),
            "CheckBoxField" => FieldSpec::check_box(Vec::<Choice>::new()),
            "RadioField" => FieldSpec::radio(Vec::<Choice>::new()),
            "DataListField" => FieldSpec::data_list(Vec::<Choice>::new()),
            "PasswordField" => FieldSpec::password(),
            "PhoneField" => FieldSpec::phone(),
            "FileField" => FieldSpec::file(),
            "ImageField" => FieldSpec::image(),
            "HiddenField" => FieldSpec::hidden(),
            other => return Err(SchemaError::UnknownFieldType(other.to_string())),
        };
        Ok(builder)
    }

    fn reject(&mut self, constraint: &'static str) {
        self.unsupported.get_or_insert(constraint);
    }

    /// Sets whether an empty value is an error.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether a null value is accepted.
    pub fn allow_null(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    /// Sets whether an empty value is accepted.
    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    /// Sets the rendering-only read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the rendering-only disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the default value used when nothing is submitted.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets a regex that the value must match (from its start) before
    /// type validation.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the placeholder text.
    pub fn place_holder(mut self, text: impl Into<String>) -> Self {
        self.place_holder = Some(text.into());
        self
    }

    /// Sets the message surfaced in place of any specific failure message.
    pub fn custom_error(mut self, message: impl Into<String>) -> Self {
        self.custom_error = Some(message.into());
        self
    }

    /// Sets the help text.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Sets the style hint.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Sets the autofocus hint.
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Sets the autocomplete hint.
    pub fn auto_complete(mut self, auto_complete: bool) -> Self {
        self.auto_complete = auto_complete;
        self
    }

    /// Appends a validator run after type validation succeeds.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets the minimum length (text-like fields).
    pub fn min_length(mut self, n: usize) -> Self {
        match &mut self.field_type {
            FieldType::Char { min_length, .. }
            | FieldType::Text { min_length, .. }
            | FieldType::Slug { min_length, .. }
            | FieldType::Password { min_length, .. } => *min_length = Some(n),
            _ => self.reject("min_length"),
        }
        self
    }

    /// Sets the maximum length (text-like fields).
    pub fn max_length(mut self, n: usize) -> Self {
        match &mut self.field_type {
            FieldType::Char { max_length, .. }
            | FieldType::Text { max_length, .. }
            | FieldType::Slug { max_length, .. }
            | FieldType::Password { max_length, .. } => *max_length = Some(n),
            _ => self.reject("max_length"),
        }
        self
    }

    /// Sets the lower bound (numeric and date/time fields).
    ///
    /// Date and time bounds may be given as strings; they are parsed by
    /// [`build`](Self::build).
    pub fn min_value(mut self, value: impl Into<Value>) -> Self {
        self.min_value = Some(value.into());
        self
    }

    /// Sets the upper bound (numeric and date/time fields).
    pub fn max_value(mut self, value: impl Into<Value>) -> Self {
        self.max_value = Some(value.into());
        self
    }

    /// Sets the step hint (numeric fields).
    pub fn step(mut self, value: f64) -> Self {
        match &mut self.field_type {
            FieldType::Integer { step, .. }
            | FieldType::Float { step, .. }
            | FieldType::Decimal { step, .. }
            | FieldType::Range { step, .. } => *step = Some(value),
            _ => self.reject("step"),
        }
        self
    }

    /// Replaces the choices (choice-type fields).
    pub fn choices<C: Into<Choice>>(mut self, items: impl IntoIterator<Item = C>) -> Self {
        let items: Vec<Choice> = items.into_iter().map(Into::into).collect();
        match &mut self.field_type {
            FieldType::Choice { choices, .. }
            | FieldType::CheckBox { choices }
            | FieldType::Radio { choices }
            | FieldType::DataList { choices } => *choices = items,
            _ => self.reject("choices"),
        }
        self
    }

    /// Allows several values to be picked (`ChoiceField` only).
    pub fn multiple(mut self, value: bool) -> Self {
        match &mut self.field_type {
            FieldType::Choice { multiple, .. } => *multiple = value,
            _ => self.reject("multiple"),
        }
        self
    }

    fn with_policy(mut self, constraint: &'static str, apply: impl FnOnce(&mut PasswordPolicy)) -> Self {
        match &mut self.field_type {
            FieldType::Password { policy, .. } => apply(policy),
            _ => self.reject(constraint),
        }
        self
    }

    /// Requires a numeric character (`PasswordField` only).
    pub fn must_contain_number(self, value: bool) -> Self {
        self.with_policy("must_contain_number", |p| p.must_contain_number = value)
    }

    /// Requires a symbol (`PasswordField` only).
    pub fn must_contain_symbol(self, value: bool) -> Self {
        self.with_policy("must_contain_symbol", |p| p.must_contain_symbol = value)
    }

    /// Requires an upper case character (`PasswordField` only).
    pub fn must_contain_upper_case(self, value: bool) -> Self {
        self.with_policy("must_contain_upper_case", |p| {
            p.must_contain_upper_case = value;
        })
    }

    /// Requires a lower case character (`PasswordField` only).
    pub fn must_contain_lower_case(self, value: bool) -> Self {
        self.with_policy("must_contain_lower_case", |p| {
            p.must_contain_lower_case = value;
        })
    }

    /// Requires international format (`PhoneField` only).
    pub fn internationalize(mut self, value: bool) -> Self {
        match &mut self.field_type {
            FieldType::Phone { internationalize } => *internationalize = value,
            _ => self.reject("internationalize"),
        }
        self
    }

    /// Sets the visible rows (`TextField` only).
    pub fn rows(mut self, value: u32) -> Self {
        match &mut self.field_type {
            FieldType::Text { rows, .. } => *rows = Some(value),
            _ => self.reject("rows"),
        }
        self
    }

    /// Sets the visible columns (`TextField` only).
    pub fn cols(mut self, value: u32) -> Self {
        match &mut self.field_type {
            FieldType::Text { cols, .. } => *cols = Some(value),
            _ => self.reject("cols"),
        }
        self
    }

    fn with_file(mut self, constraint: &'static str, apply: impl FnOnce(&mut FileConstraints)) -> Self {
        match &mut self.field_type {
            FieldType::File(file) | FieldType::Image { file, .. } => apply(file),
            _ => self.reject(constraint),
        }
        self
    }

    /// Sets the minimum upload size in bytes (file fields).
    pub fn min_size(self, bytes: u64) -> Self {
        self.with_file("min_size", |f| f.min_size = Some(bytes))
    }

    /// Sets the maximum upload size in bytes (file fields).
    pub fn max_size(self, bytes: u64) -> Self {
        self.with_file("max_size", |f| f.max_size = Some(bytes))
    }

    /// Sets the accepted MIME type pattern (file fields).
    pub fn file_type(self, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        self.with_file("file_type", |f| f.file_type = Some(mime))
    }

    /// Sets the source URL of an existing upload (file fields).
    pub fn src(self, src: impl Into<String>) -> Self {
        let src = src.into();
        self.with_file("src", |f| f.src = Some(src))
    }

    /// Sets the expected width (`ImageField` only).
    pub fn width(mut self, value: u32) -> Self {
        match &mut self.field_type {
            FieldType::Image { width, .. } => *width = Some(value),
            _ => self.reject("width"),
        }
        self
    }

    /// Sets the expected height (`ImageField` only).
    pub fn height(mut self, value: u32) -> Self {
        match &mut self.field_type {
            FieldType::Image { height, .. } => *height = Some(value),
            _ => self.reject("height"),
        }
        self
    }

    /// Checks every declaration invariant and produces the spec.
    ///
    /// Fails when a constraint does not apply to the field type, when
    /// `required` is combined with a non-empty default, when a choice-type
    /// field has no choices, when the pattern does not compile, or when a
    /// bound cannot be interpreted for the field type.
    pub fn build(mut self) -> Result<FieldSpec, SchemaError> {
        let tag = self.field_type.tag();

        if let Some(constraint) = self.unsupported {
            return Err(SchemaError::UnsupportedConstraint {
                field_type: tag,
                constraint,
            });
        }

        if self.required && self.default.as_ref().is_some_and(|d| !d.is_empty()) {
            return Err(SchemaError::RequiredWithDefault { field_type: tag });
        }

        if self.field_type.choices().is_some_and(<[Choice]>::is_empty) {
            return Err(SchemaError::MissingChoices { field_type: tag });
        }

        let pattern = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: self.pattern.clone().unwrap_or_default(),
                reason: e.to_string(),
            })?;

        if let Some(min) = self.min_value.take() {
            apply_bound(&mut self.field_type, "min_value", min)?;
        }
        if let Some(max) = self.max_value.take() {
            apply_bound(&mut self.field_type, "max_value", max)?;
        }

        Ok(FieldSpec {
            name: String::new(),
            label: self.label,
            field_type: self.field_type,
            required: self.required,
            allow_null: self.allow_null,
            allow_blank: self.allow_blank,
            read_only: self.read_only,
            disabled: self.disabled,
            default: self.default,
            pattern,
            place_holder: self.place_holder,
            custom_error: self.custom_error,
            help_text: self.help_text,
            style: self.style,
            auto_focus: self.auto_focus,
            auto_complete: self.auto_complete,
            validators: self.validators,
        })
    }
}

impl TryFrom<FieldBuilder> for FieldSpec {
    type Error = SchemaError;

    fn try_from(builder: FieldBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Resolves a pending bound against the field type and stores it.
fn apply_bound(
    field_type: &mut FieldType,
    constraint: &'static str,
    value: Value,
) -> Result<(), SchemaError> {
    let tag = field_type.tag();
    let invalid = |value: &Value| SchemaError::InvalidBound {
        field_type: tag,
        constraint,
        value: value.to_string(),
    };
    let is_min = constraint == "min_value";

    match field_type {
        FieldType::Integer {
            min_value,
            max_value,
            ..
        } => {
            let bound = match &value {
                Value::Int(i) => *i,
                Value::String(s) => s.trim().parse().map_err(|_| invalid(&value))?,
                _ => return Err(invalid(&value)),
            };
            *(if is_min { min_value } else { max_value }) = Some(bound);
        }
        FieldType::Float {
            min_value,
            max_value,
            ..
        }
        | FieldType::Decimal {
            min_value,
            max_value,
            ..
        }
        | FieldType::Range {
            min_value,
            max_value,
            ..
        } => {
            #[allow(clippy::cast_precision_loss)]
            let bound = match &value {
                Value::Int(i) => *i as f64,
                Value::Float(f) => *f,
                Value::String(s) => s
                    .trim()
                    .replace(',', ".")
                    .parse()
                    .map_err(|_| invalid(&value))?,
                _ => return Err(invalid(&value)),
            };
            *(if is_min { min_value } else { max_value }) = Some(bound);
        }
        FieldType::Date {
            min_value,
            max_value,
        }
        | FieldType::DateTime {
            min_value,
            max_value,
        } => {
            let bound = match &value {
                Value::Date(d) => d.and_time(NaiveTime::MIN),
                Value::DateTime(dt) => *dt,
                Value::String(s) => parse_datetime(s).ok_or_else(|| invalid(&value))?,
                _ => return Err(invalid(&value)),
            };
            *(if is_min { min_value } else { max_value }) = Some(bound);
        }
        FieldType::Time {
            min_value,
            max_value,
        } => {
            let bound = match &value {
                Value::Time(t) => *t,
                Value::String(s) => parse_time(s).ok_or_else(|| invalid(&value))?,
                _ => return Err(invalid(&value)),
            };
            *(if is_min { min_value } else { max_value }) = Some(bound);
        }
        _ => {
            return Err(SchemaError::UnsupportedConstraint {
                field_type: tag,
                constraint,
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::MaxLengthValidator;

    #[test]
    fn test_builder_defaults() {
        let spec = FieldSpec::char().build().unwrap();
        assert!(spec.required());
        assert!(spec.allow_null());
        assert!(spec.allow_blank());
        assert!(!spec.read_only());
        assert!(!spec.disabled());
        assert!(spec.default_value().is_none());
        assert_eq!(spec.name(), "");
        assert_eq!(spec.type_tag(), "CharField");
    }

    #[test]
    fn test_required_with_default_fails() {
        let result = FieldSpec::char().default("tr").build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::RequiredWithDefault {
                field_type: "CharField"
            }
        );
    }

    #[test]
    fn test_required_with_default_fails_for_every_type() {
        let builders = vec![
            FieldSpec::integer().default(5),
            FieldSpec::email().default("a@b.co"),
            FieldSpec::boolean().default(false),
            FieldSpec::date().default("2020-05-12"),
            FieldSpec::hidden().default("x"),
        ];
        for builder in builders {
            assert!(matches!(
                builder.build(),
                Err(SchemaError::RequiredWithDefault { .. })
            ));
        }
    }

    #[test]
    fn test_required_with_empty_default_is_allowed() {
        assert!(FieldSpec::char().default("").build().is_ok());
    }

    #[test]
    fn test_optional_with_default() {
        let spec = FieldSpec::char().required(false).default("tr").build().unwrap();
        assert_eq!(spec.default_value(), Some(&Value::from("tr")));
    }

    #[test]
    fn test_choice_without_choices_fails() {
        let result = FieldSpec::choice(Vec::<Choice>::new()).build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::MissingChoices {
                field_type: "ChoiceField"
            }
        );
        assert!(FieldSpec::radio(Vec::<&str>::new()).build().is_err());
    }

    #[test]
    fn test_unsupported_constraint() {
        let result = FieldSpec::boolean().max_length(3).build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::UnsupportedConstraint {
                field_type: "BooleanField",
                constraint: "max_length",
            }
        );
        assert!(FieldSpec::char().min_value(3).build().is_err());
        assert!(FieldSpec::char().must_contain_number(true).build().is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FieldSpec::char().pattern("(unclosed").build();
        assert!(matches!(result, Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_integer_bounds() {
        let spec = FieldSpec::integer().min_value(1).max_value("10").build().unwrap();
        assert_eq!(
            spec.field_type(),
            &FieldType::Integer {
                min_value: Some(1),
                max_value: Some(10),
                step: None,
            }
        );
    }

    #[test]
    fn test_invalid_integer_bound() {
        let result = FieldSpec::integer().max_value("ten").build();
        assert!(matches!(result, Err(SchemaError::InvalidBound { .. })));
    }

    #[test]
    fn test_date_bounds_parsed_at_build() {
        let spec = FieldSpec::date_time()
            .max_value("2020.06.20")
            .build()
            .unwrap();
        if let FieldType::DateTime { max_value, .. } = spec.field_type() {
            assert_eq!(max_value.unwrap().to_string(), "2020-06-20 00:00:00");
        } else {
            panic!("Expected DateTime");
        }
        assert!(FieldSpec::date().min_value("not a date").build().is_err());
    }

    #[test]
    fn test_time_bounds() {
        let spec = FieldSpec::time().min_value("08:00").build().unwrap();
        if let FieldType::Time { min_value, .. } = spec.field_type() {
            assert_eq!(*min_value, NaiveTime::from_hms_opt(8, 0, 0));
        } else {
            panic!("Expected Time");
        }
    }

    #[test]
    fn test_label_defaults_to_name() {
        let spec = FieldSpec::char().build().unwrap().with_name("username");
        assert_eq!(spec.label(), "username");
        let spec = FieldSpec::char()
            .label("User name")
            .build()
            .unwrap()
            .with_name("username");
        assert_eq!(spec.label(), "User name");
    }

    #[test]
    fn test_image_defaults_file_type() {
        let spec = FieldSpec::image().width(10).build().unwrap();
        if let FieldType::Image { file, width, .. } = spec.field_type() {
            assert_eq!(file.file_type.as_deref(), Some("image/*"));
            assert_eq!(*width, Some(10));
        } else {
            panic!("Expected Image");
        }
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(
            FieldBuilder::from_tag("PhoneField").unwrap().build().unwrap().type_tag(),
            "PhoneField"
        );
        assert_eq!(
            FieldBuilder::from_tag("Nope").unwrap_err(),
            SchemaError::UnknownFieldType("Nope".into())
        );
        let spec = FieldBuilder::from_tag("RadioField")
            .unwrap()
            .choices(["a", "b"])
            .build()
            .unwrap();
        assert_eq!(spec.field_type().choices().map(<[Choice]>::len), Some(2));
    }

    #[test]
    fn test_choice_conversions() {
        assert_eq!(Choice::from("a"), Choice::new("a", "a"));
        assert_eq!(Choice::from(("Apple", "a")), Choice::new("Apple", "a"));
    }

    #[test]
    fn test_validators_kept_in_order() {
        let spec = FieldSpec::char()
            .validator(MaxLengthValidator::new(3))
            .validator(MaxLengthValidator::new(5))
            .build()
            .unwrap();
        assert_eq!(spec.validators().len(), 2);
    }

    #[test]
    fn test_as_json_has_no_values() {
        let spec = FieldSpec::password()
            .required(false)
            .default("secret1")
            .min_length(5)
            .must_contain_number(true)
            .build()
            .unwrap()
            .with_name("password");
        let json = spec.as_json();
        assert_eq!(json["field_type"], "PasswordField");
        assert_eq!(json["field_name"], "password");
        assert_eq!(json["min_length"], 5);
        assert_eq!(json["must_contain_number"], true);
        assert!(json.get("default").is_none());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_as_json_choices() {
        let spec = FieldSpec::choice([("Apple", "a"), ("Banana", "b")])
            .multiple(true)
            .build()
            .unwrap()
            .with_name("fruit");
        let json = spec.as_json();
        assert_eq!(json["choices"][0]["display"], "Apple");
        assert_eq!(json["choices"][1]["value"], "b");
        assert_eq!(json["multiple"], true);
    }
}
