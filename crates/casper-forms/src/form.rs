//! The form orchestrator.
//!
//! A [`Form`] is one submission's worth of state built from a shared
//! [`FormSchema`]. It owns a [`BoundField`] per schema field, binds input
//! data and per-instance defaults, runs validation once (memoized until the
//! next bind), and exposes clean data and errors.
//!
//! ```
//! use std::collections::HashMap;
//! use casper_core::Value;
//! use casper_forms::fields::FieldSpec;
//! use casper_forms::form::Form;
//! use casper_forms::schema::FormSchema;
//!
//! let schema = FormSchema::builder("LoginForm")
//!     .field("username", FieldSpec::char().max_length(20))
//!     .field("age", FieldSpec::integer())
//!     .build()
//!     .unwrap()
//!     .into_shared();
//!
//! let data = HashMap::from([
//!     ("username".to_string(), Value::from("alice")),
//!     ("age".to_string(), Value::from("30")),
//! ]);
//! let mut form = Form::construct(schema, Some(data), None);
//! assert!(form.is_valid());
//! assert_eq!(form.clean_data().unwrap()["age"], Value::Int(30));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use casper_core::logging::validation_span;
use casper_core::{CasperError, CasperResult, Value};

use crate::bound_field::{BoundField, FieldDescriptor};
use crate::schema::{FormMeta, FormSchema, HookContext};
use crate::validation;

/// Submitted data or initial values, keyed by field name.
pub type FormData = HashMap<String, Value>;

/// One form instance: bound data plus validation results.
#[derive(Debug, Clone)]
pub struct Form {
    schema: Arc<FormSchema>,
    fields: Vec<BoundField>,
    data: FormData,
    initial: FormData,
    bound: bool,
    validated: bool,
    errors: HashMap<String, String>,
    clean_data: HashMap<String, Value>,
}

impl Form {
    /// Creates an unbound form with no initial values.
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let fields = schema
            .fields()
            .map(|spec| BoundField::new(Arc::clone(spec)))
            .collect();
        Self {
            schema,
            fields,
            data: FormData::new(),
            initial: FormData::new(),
            bound: false,
            validated: false,
            errors: HashMap::new(),
            clean_data: HashMap::new(),
        }
    }

    /// Creates a form, applying `initial` and then binding `data`.
    ///
    /// When data is given the form is validated immediately.
    pub fn construct(
        schema: Arc<FormSchema>,
        data: Option<FormData>,
        initial: Option<FormData>,
    ) -> Self {
        let mut form = Self::new(schema);
        if let Some(initial) = initial {
            form.set_initial(initial);
        }
        if let Some(data) = data {
            form.bind(data);
        }
        form
    }

    /// Applies per-instance defaults (builder style).
    #[must_use]
    pub fn with_initial(mut self, initial: FormData) -> Self {
        self.set_initial(initial);
        self
    }

    /// Applies per-instance defaults. Keys that are not fields are kept in
    /// [`initial`](Self::initial) but otherwise ignored.
    pub fn set_initial(&mut self, initial: FormData) {
        for field in &mut self.fields {
            if let Some(value) = initial.get(field.name()) {
                field.bind_default(value.clone());
            }
        }
        self.initial = initial;
        self.invalidate();
    }

    /// Binds submitted data and validates.
    ///
    /// Keys that are not fields are ignored. Rebinding discards the
    /// previous validation results.
    pub fn bind(&mut self, data: FormData) {
        for field in &mut self.fields {
            match data.get(field.name()) {
                Some(value) => field.bind(value.clone()),
                None => field.clear_data(),
            }
        }
        for key in data.keys().filter(|k| self.schema.field(k).is_none()) {
            tracing::trace!(form = %self.schema.name(), key = %key, "ignoring unknown key");
        }
        self.data = data;
        self.bound = true;
        self.invalidate();
        self.full_clean();
    }

    /// Binds a JSON object as submitted data.
    pub fn bind_json(&mut self, json: serde_json::Value) -> CasperResult<()> {
        let serde_json::Value::Object(map) = json else {
            return Err(CasperError::SerializationError(
                "Form data must be a JSON object".to_string(),
            ));
        };
        self.bind(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect());
        Ok(())
    }

    fn invalidate(&mut self) {
        self.validated = false;
        self.errors.clear();
        self.clean_data.clear();
        for field in &mut self.fields {
            field.reset();
        }
    }

    /// Validates (once) and reports whether every field passed.
    pub fn is_valid(&mut self) -> bool {
        if !self.validated {
            self.full_clean();
        }
        self.errors.is_empty()
    }

    fn full_clean(&mut self) {
        let span = validation_span(self.schema.name());
        let _guard = span.enter();

        let ctx = HookContext {
            data: &self.data,
            initial: &self.initial,
        };
        let (clean_data, errors) = validation::clean_fields(&self.schema, &mut self.fields, &ctx);

        tracing::debug!(
            fields = self.fields.len(),
            errors = errors.len(),
            "form validated"
        );

        self.clean_data = if errors.is_empty() {
            clean_data
        } else {
            HashMap::new()
        };
        self.errors = errors;
        self.validated = true;
    }

    /// The clean values of every field. Empty when any field failed.
    pub fn clean_data(&self) -> CasperResult<&HashMap<String, Value>> {
        if self.validated {
            Ok(&self.clean_data)
        } else {
            Err(CasperError::NotValidated)
        }
    }

    /// The surfaced error message of each failing field.
    pub fn errors(&self) -> CasperResult<&HashMap<String, String>> {
        if self.validated {
            Ok(&self.errors)
        } else {
            Err(CasperError::NotValidated)
        }
    }

    /// The form name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// The metadata block.
    pub fn meta(&self) -> &FormMeta {
        self.schema.meta()
    }

    /// The shared schema.
    pub const fn schema(&self) -> &Arc<FormSchema> {
        &self.schema
    }

    /// Returns `true` once data has been bound.
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// The bound data, including keys that are not fields.
    pub const fn data(&self) -> &FormData {
        &self.data
    }

    /// The per-instance initial values.
    pub const fn initial(&self) -> &FormData {
        &self.initial
    }

    /// Looks up a bound field by name.
    pub fn field(&self, name: &str) -> Option<&BoundField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// All bound fields, in declaration order.
    pub fn bound_fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Render snapshots of every field, in declaration order.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(BoundField::descriptor).collect()
    }

    /// Describes every field and button for JSON clients.
    pub fn as_json(&self) -> serde_json::Value {
        self.schema.as_json()
    }

    /// Clean data as a JSON object.
    pub fn clean_data_json(&self) -> CasperResult<serde_json::Value> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .clean_data()?
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Ok(serde_json::Value::Object(map))
    }
}
