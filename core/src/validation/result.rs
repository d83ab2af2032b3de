//! # VALIDATION RESULT AND ERROR AGGREGATION
//!
//! One [`FieldState`] per schema field, in schema order. The form is valid
//! when no field carries an error.

use super::error_codes;
use crate::errors::FormError;
use crate::types::{FieldDescriptor, FieldType, FieldValue};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Field-scoped error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "&'static str")]
pub enum ErrorKind {
    MissingValue,
    IncorrectType,
    FileType,
    FieldsDoNotMatch,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingValue => error_codes::MISSING_VALUE,
            ErrorKind::IncorrectType => error_codes::INCORRECT_TYPE,
            ErrorKind::FileType => error_codes::FILE_TYPE,
            ErrorKind::FieldsDoNotMatch => error_codes::FIELDS_DO_NOT_MATCH,
        }
    }
}

impl From<ErrorKind> for &'static str {
    fn from(kind: ErrorKind) -> Self {
        kind.code()
    }
}

/// Error state of a single field. `kind == None` means no error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl FieldError {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }

    pub fn missing_value(name: &str) -> Self {
        Self {
            kind: Some(ErrorKind::MissingValue),
            message: format!("Missing value for {} field", name),
        }
    }

    pub fn incorrect_type(field_type: FieldType, name: &str) -> Self {
        Self {
            kind: Some(ErrorKind::IncorrectType),
            message: format!("Expected a value of type {} for {} field", field_type, name),
        }
    }

    pub fn file(cause: &FormError) -> Self {
        Self {
            kind: Some(ErrorKind::FileType),
            message: format!("File error: {}", cause),
        }
    }

    pub fn mismatch(name: &str, target: &str) -> Self {
        Self {
            kind: Some(ErrorKind::FieldsDoNotMatch),
            message: format!("Value for {} field does not match {} field", name, target),
        }
    }
}

/// Outcome of one validation pass for one schema field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldState {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Submitted text, repeated values already joined.
    pub initial: String,
    pub value: FieldValue,
    pub error: FieldError,
}

impl FieldState {
    pub(crate) fn pending(descriptor: &FieldDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            field_type: descriptor.field_type,
            initial: String::new(),
            value: FieldValue::Unset,
            error: FieldError::default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }
}

/// `{name, message}` pair for a field in error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    fields: Vec<FieldState>,
}

impl ValidationResult {
    pub(crate) fn new(fields: Vec<FieldState>) -> Self {
        Self { fields }
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldState::is_valid)
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    /// First field state with this name.
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    /// Error of the named field; empty when the field is absent or valid.
    pub fn field_error(&self, name: &str) -> FieldError {
        self.field(name)
            .map(|f| f.error.clone())
            .unwrap_or_default()
    }

    /// Every field currently in error, in schema order.
    pub fn all_field_errors(&self) -> Vec<ErrorEntry> {
        self.fields
            .iter()
            .filter(|f| !f.error.is_empty())
            .map(|f| ErrorEntry {
                name: f.name.clone(),
                message: f.error.message.clone(),
            })
            .collect()
    }

    /// Errors keyed by field name, shaped for template rendering:
    /// `{"title": {"title": "title", "error": "Missing value for title field"}}`.
    pub fn form_errors(&self) -> JsonValue {
        let mut map = Map::new();
        for entry in self.all_field_errors() {
            let mut inner = Map::new();
            inner.insert(entry.name.clone(), JsonValue::String(entry.name.clone()));
            inner.insert("error".to_string(), JsonValue::String(entry.message));
            map.insert(entry.name, JsonValue::Object(inner));
        }
        JsonValue::Object(map)
    }
}
