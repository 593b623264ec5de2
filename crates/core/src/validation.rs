//! Validation error collector.
//!
//! Validators append errors here instead of failing fast, so a single request
//! can report every problem at once. An error is either *global* (about the
//! object as a whole) or *field-scoped* (about one named property).

use serde::{Serialize, Serializer};

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the validated object (e.g. `eventDto`).
    pub object_name: String,

    /// Property the error refers to; `None` for global errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Machine-readable error code (e.g. `wrongValue`, `NotEmpty`).
    pub code: String,

    /// Human-readable message.
    pub default_message: String,

    /// The offending value, when one is meaningful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<serde_json::Value>,
}

impl FieldError {
    pub fn is_global(&self) -> bool {
        self.field.is_none()
    }
}

/// Ordered collection of validation failures for one object.
///
/// Serializes as a plain JSON array of [`FieldError`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    object_name: String,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            errors: Vec::new(),
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Register a global error.
    pub fn reject(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            object_name: self.object_name.clone(),
            field: None,
            code: code.into(),
            default_message: message.into(),
            rejected_value: None,
        });
    }

    /// Register an error for a specific field.
    pub fn reject_value(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        rejected_value: Option<serde_json::Value>,
    ) {
        self.errors.push(FieldError {
            object_name: self.object_name.clone(),
            field: Some(field.into()),
            code: code.into(),
            default_message: message.into(),
            rejected_value,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn global_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(|e| e.is_global())
    }

    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors
            .iter()
            .filter(move |e| e.field.as_deref() == Some(field))
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.field_errors(field).next().is_some()
    }

    /// `Ok(())` when nothing was rejected, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.errors)
    }
}
