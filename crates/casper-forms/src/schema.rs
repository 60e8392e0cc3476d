//! Form schemas.
//!
//! A [`FormSchema`] is the immutable, shareable definition of a form: its
//! name, its ordered fields and buttons, its metadata block, and any
//! per-field hooks. Schemas are assembled with a [`SchemaBuilder`], which
//! supports inheriting from another schema, re-declaring inherited fields,
//! and shadowing them away.
//!
//! ```
//! use casper_forms::fields::FieldSpec;
//! use casper_forms::schema::FormSchema;
//!
//! let base = FormSchema::builder("BaseForm")
//!     .field("name", FieldSpec::char().max_length(50))
//!     .field("email", FieldSpec::email())
//!     .build()
//!     .unwrap();
//!
//! let signup = FormSchema::builder("SignupForm")
//!     .inherit(&base)
//!     .field("age", FieldSpec::integer().required(false))
//!     .shadow("email")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(signup.field_names(), vec!["name", "age"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use casper_core::{SchemaError, ValidationError, Value, SETTINGS};

use crate::fields::{FieldBuilder, FieldSpec};
use crate::form::FormData;

/// The metadata block of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMeta {
    /// Submission method; defaults to `"post"`.
    pub method: String,
    /// Submission target; defaults to `""`.
    pub url: String,
    /// Style hint passed through to renderers.
    pub style: Option<String>,
}

impl Default for FormMeta {
    /// Takes the defaults from the global settings when configured.
    fn default() -> Self {
        let defaults = SETTINGS.form_defaults();
        Self {
            method: defaults.method,
            url: defaults.url,
            style: defaults.style,
        }
    }
}

/// The kind of a form button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// A plain button.
    Button,
    /// A submit button.
    Submit,
    /// A reset button.
    Reset,
}

impl ButtonKind {
    /// The type tag exposed to renderers.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Button => "ButtonField",
            Self::Submit => "SubmitButtonField",
            Self::Reset => "ResetButtonField",
        }
    }

    /// The HTML button type.
    pub const fn button_type(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }

    /// Looks a button kind up by its tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ButtonField" => Some(Self::Button),
            "SubmitButtonField" => Some(Self::Submit),
            "ResetButtonField" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// A button declared on a form. Buttons are rendered but never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    name: String,
    kind: ButtonKind,
    label: Option<String>,
    style: Option<String>,
}

impl ButtonSpec {
    /// Creates a button of the given kind.
    pub const fn new(kind: ButtonKind) -> Self {
        Self {
            name: String::new(),
            kind,
            label: None,
            style: None,
        }
    }

    /// Creates a submit button.
    pub const fn submit() -> Self {
        Self::new(ButtonKind::Submit)
    }

    /// Creates a reset button.
    pub const fn reset() -> Self {
        Self::new(ButtonKind::Reset)
    }

    /// Creates a plain button.
    pub const fn button() -> Self {
        Self::new(ButtonKind::Button)
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the style hint.
    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The button kind.
    pub const fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Describes the button for JSON clients.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::json!({
            "field_type": self.kind.tag(),
            "field_name": self.name,
            "label": self.label.as_deref().unwrap_or(&self.name),
            "style": self.style,
            "button_type": self.kind.button_type(),
        })
    }
}

/// One declared entry of a schema, in declaration order.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// A validated field.
    Field(Arc<FieldSpec>),
    /// A button.
    Button(ButtonSpec),
}

impl SchemaEntry {
    /// The declared name.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(spec) => spec.name(),
            Self::Button(button) => button.name(),
        }
    }

    /// Describes the entry for JSON clients.
    pub fn as_json(&self) -> serde_json::Value {
        match self {
            Self::Field(spec) => spec.as_json(),
            Self::Button(button) => button.as_json(),
        }
    }
}

/// Read-only view of the submission handed to field hooks.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// The bound data.
    pub data: &'a FormData,
    /// The per-instance initial values.
    pub initial: &'a FormData,
}

/// A per-field hook run after the field's pipeline succeeds.
///
/// Receives the clean value; returns the value to keep or an error whose
/// message is surfaced unchanged.
pub type FieldHook =
    Arc<dyn Fn(&Value, &HookContext<'_>) -> Result<Value, ValidationError> + Send + Sync>;

/// The immutable definition of a form. Share it behind an [`Arc`].
#[derive(Clone)]
pub struct FormSchema {
    name: String,
    entries: Vec<SchemaEntry>,
    meta: FormMeta,
    hooks: HashMap<String, FieldHook>,
}

impl fmt::Debug for FormSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<&String> = self.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("FormSchema")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .field("meta", &self.meta)
            .field("hooks", &hooks)
            .finish()
    }
}

impl FormSchema {
    /// Starts a builder for a schema with the given form name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Wraps the schema for sharing between form instances and threads.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The form name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The metadata block.
    pub const fn meta(&self) -> &FormMeta {
        &self.meta
    }

    /// All entries, fields and buttons, in declaration order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// The validated fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Arc<FieldSpec>> {
        self.entries.iter().filter_map(|entry| match entry {
            SchemaEntry::Field(spec) => Some(spec),
            SchemaEntry::Button(_) => None,
        })
    }

    /// The buttons, in declaration order.
    pub fn buttons(&self) -> impl Iterator<Item = &ButtonSpec> {
        self.entries.iter().filter_map(|entry| match entry {
            SchemaEntry::Button(button) => Some(button),
            SchemaEntry::Field(_) => None,
        })
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldSpec>> {
        self.fields().find(|spec| spec.name() == name)
    }

    /// Names of the validated fields, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().map(|spec| spec.name()).collect()
    }

    /// Returns the hook registered for a field.
    pub fn hook(&self, name: &str) -> Option<&FieldHook> {
        self.hooks.get(name)
    }

    /// Describes every entry for JSON clients, in declaration order.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.entries.iter().map(SchemaEntry::as_json).collect())
    }

    /// Describes the form as a whole: name, metadata, and entries.
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "method": self.meta.method,
            "url": self.meta.url,
            "style": self.meta.style,
            "fields": self.as_json(),
        })
    }
}

#[derive(Debug, Default)]
struct MetaOverrides {
    method: Option<String>,
    url: Option<String>,
    style: Option<String>,
}

/// Builder for [`FormSchema`].
///
/// Declarations are recorded in order. Inheriting copies the base schema's
/// entries, hooks, and metadata; a later declaration under an inherited
/// name replaces that entry in place, while new names are appended.
pub struct SchemaBuilder {
    name: String,
    entries: Vec<SchemaEntry>,
    meta: FormMeta,
    overrides: MetaOverrides,
    hooks: HashMap<String, FieldHook>,
    error: Option<SchemaError>,
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            meta: FormMeta::default(),
            overrides: MetaOverrides::default(),
            hooks: HashMap::new(),
            error: None,
        }
    }

    fn fail(&mut self, err: SchemaError) {
        self.error.get_or_insert(err);
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name() == name)
    }

    fn put(&mut self, entry: SchemaEntry) {
        match self.position(entry.name()) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Copies entries, hooks, and metadata from a base schema.
    ///
    /// May be called several times; later bases override earlier ones the
    /// same way a direct declaration would.
    #[must_use]
    pub fn inherit(mut self, base: &FormSchema) -> Self {
        for entry in &base.entries {
            self.put(entry.clone());
        }
        for (name, hook) in &base.hooks {
            self.hooks.insert(name.clone(), Arc::clone(hook));
        }
        self.meta = base.meta.clone();
        self
    }

    /// Declares a field. The builder's errors are reported by
    /// [`build`](Self::build).
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, builder: FieldBuilder) -> Self {
        match builder.build() {
            Ok(spec) => self.declare(name, Some(spec)),
            Err(err) => {
                self.fail(err);
                self
            }
        }
    }

    /// Declares an already-built field, or shadows the name when `None`.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>, spec: Option<FieldSpec>) -> Self {
        let name = name.into();
        if name.is_empty() {
            self.fail(SchemaError::EmptyFieldName);
            return self;
        }
        match spec {
            Some(spec) => {
                let spec = spec.with_name(name);
                self.put(SchemaEntry::Field(Arc::new(spec)));
            }
            None => {
                self.entries.retain(|entry| entry.name() != name);
                self.hooks.remove(&name);
            }
        }
        self
    }

    /// Removes an inherited field or button.
    #[must_use]
    pub fn shadow(self, name: impl Into<String>) -> Self {
        self.declare(name, None)
    }

    /// Declares a button.
    #[must_use]
    pub fn button(mut self, name: impl Into<String>, mut button: ButtonSpec) -> Self {
        let name = name.into();
        if name.is_empty() {
            self.fail(SchemaError::EmptyFieldName);
            return self;
        }
        self.hooks.remove(&name);
        button.name = name;
        self.put(SchemaEntry::Button(button));
        self
    }

    /// Sets the submission method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.overrides.method = Some(method.into());
        self
    }

    /// Sets the submission target.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.overrides.url = Some(url.into());
        self
    }

    /// Sets the form style hint.
    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.overrides.style = Some(style.into());
        self
    }

    /// Registers a hook for a field, replacing any inherited one.
    #[must_use]
    pub fn hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Value, &HookContext<'_>) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Checks the declarations and produces the schema.
    pub fn build(self) -> Result<FormSchema, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut unknown: Vec<&String> = self
            .hooks
            .keys()
            .filter(|name| {
                !self
                    .entries
                    .iter()
                    .any(|entry| matches!(entry, SchemaEntry::Field(spec) if spec.name() == name.as_str()))
            })
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(SchemaError::UnknownHookField((*name).clone()));
        }

        let mut meta = self.meta;
        if let Some(method) = self.overrides.method {
            meta.method = method.to_lowercase();
        }
        if let Some(url) = self.overrides.url {
            meta.url = url;
        }
        if let Some(style) = self.overrides.style {
            meta.style = Some(style);
        }

        tracing::debug!(
            form = %self.name,
            entries = self.entries.len(),
            hooks = self.hooks.len(),
            "built form schema"
        );

        Ok(FormSchema {
            name: self.name,
            entries: self.entries,
            meta,
            hooks: self.hooks,
        })
    }
}
