//! # FORM SCHEMA TYPES
//!
//! Field descriptors, declared field types and the typed values produced
//! by coercion. A [`Schema`] is immutable once built; every validation pass
//! produces a fresh result instead of writing back into it.

use crate::errors::FormError;
use crate::request::UploadedFile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Declared type of a form field.
///
/// `Untyped` is the explicit "no coercion" variant: the submitted text is
/// stored unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Untyped,
    String,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    File,
}

impl FieldType {
    /// Canonical type name, as accepted by [`FieldType::from_str`].
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Untyped => "",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Int8 => "int8",
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Uint => "uint",
            FieldType::Uint8 => "uint8",
            FieldType::Uint16 => "uint16",
            FieldType::Uint32 => "uint32",
            FieldType::Uint64 => "uint64",
            FieldType::Float32 => "float32",
            FieldType::Float64 => "float64",
            FieldType::File => "file",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field_type = match s {
            "" => FieldType::Untyped,
            "string" => FieldType::String,
            "bool" => FieldType::Bool,
            "int" => FieldType::Int,
            "int8" => FieldType::Int8,
            "int16" => FieldType::Int16,
            "int32" => FieldType::Int32,
            "int64" => FieldType::Int64,
            "uint" => FieldType::Uint,
            "uint8" => FieldType::Uint8,
            "uint16" => FieldType::Uint16,
            "uint32" => FieldType::Uint32,
            "uint64" => FieldType::Uint64,
            "float32" => FieldType::Float32,
            "float64" => FieldType::Float64,
            "file" => FieldType::File,
            other => {
                return Err(FormError::UnknownFieldType {
                    type_name: other.to_string(),
                })
            }
        };
        Ok(field_type)
    }
}

impl TryFrom<String> for FieldType {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// A coerced field value.
///
/// `Unset` stands for "no value": the field was required but missing, or
/// its coercion failed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Int(isize),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(usize),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    File(UploadedFile),
    #[default]
    Unset,
}

impl FieldValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }
}

/// Canonical text form, used by the accessors to re-project a value.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(v) => f.write_str(v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Int8(v) => write!(f, "{}", v),
            FieldValue::Int16(v) => write!(f, "{}", v),
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::Uint(v) => write!(f, "{}", v),
            FieldValue::Uint8(v) => write!(f, "{}", v),
            FieldValue::Uint16(v) => write!(f, "{}", v),
            FieldValue::Uint32(v) => write!(f, "{}", v),
            FieldValue::Uint64(v) => write!(f, "{}", v),
            FieldValue::Float32(v) => write!(f, "{}", v),
            FieldValue::Float64(v) => write!(f, "{}", v),
            FieldValue::File(file) => f.write_str(&file.filename),
            FieldValue::Unset => Ok(()),
        }
    }
}

/// Schema entry for a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// When false the submitted text is stored verbatim and never checked.
    #[serde(default)]
    pub require_validation: bool,

    /// Fallback source used when nothing was submitted.
    #[serde(default)]
    pub default: String,

    /// Name of another field whose final value must equal this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_target: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            require_validation: false,
            default: String::new(),
            match_target: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.require_validation = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn matches(mut self, target: impl Into<String>) -> Self {
        self.match_target = Some(target.into());
        self
    }
}

/// Ordered list of field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Load a schema from JSON.
    ///
    /// Accepts either `{"fields": [...]}` or a bare array of descriptors.
    /// Unknown type names and duplicate field names are rejected.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let document: serde_json::Value = serde_json::from_str(json)?;

        let descriptors = match &document {
            serde_json::Value::Array(items) => items.as_slice(),
            other => other
                .get("fields")
                .and_then(|fields| fields.as_array())
                .map(Vec::as_slice)
                .unwrap_or_default(),
        };
        for descriptor in descriptors {
            if let Some(type_name) = descriptor.get("type").and_then(|t| t.as_str()) {
                type_name.parse::<FieldType>()?;
            }
        }

        let schema = if document.is_array() {
            Schema::new(serde_json::from_value(document)?)
        } else {
            serde_json::from_value::<Schema>(document)?
        };

        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        Ok(schema)
    }

    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Index of the first field with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn first_file_field(&self) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.field_type == FieldType::File)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_names_round_trip() {
        for name in [
            "", "string", "bool", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
            "uint16", "uint32", "uint64", "float32", "float64", "file",
        ] {
            let parsed: FieldType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_field_type_unknown_rejected() {
        let result = "decimal".parse::<FieldType>();
        match result {
            Err(FormError::UnknownFieldType { type_name }) => assert_eq!(type_name, "decimal"),
            other => panic!("expected UnknownFieldType, got {:?}", other),
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::Int8(-128).to_string(), "-128");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Float32(0.12345679).to_string(), "0.12345679");
        assert_eq!(FieldValue::Unset.to_string(), "");
    }

    #[test]
    fn test_schema_from_json() {
        let schema = Schema::from_json(
            r#"{"fields": [
                {"name": "password", "type": "string", "requireValidation": true},
                {"name": "confirm", "type": "string", "requireValidation": true, "matchTarget": "password"},
                {"name": "note"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.fields[1].match_target.as_deref(), Some("password"));
        assert_eq!(schema.fields[2].field_type, FieldType::Untyped);
        assert!(!schema.fields[2].require_validation);
    }

    #[test]
    fn test_schema_from_bare_array() {
        let schema = Schema::from_json(r#"[{"name": "age", "type": "uint8", "default": "18"}]"#)
            .unwrap();
        assert_eq!(schema.fields[0].field_type, FieldType::Uint8);
        assert_eq!(schema.fields[0].default, "18");
    }

    #[test]
    fn test_schema_from_json_rejects_unknown_type() {
        let result = Schema::from_json(r#"[{"name": "age", "type": "decimal"}]"#);
        match result {
            Err(FormError::UnknownFieldType { type_name }) => assert_eq!(type_name, "decimal"),
            other => panic!("expected UnknownFieldType, got {:?}", other),
        }

        let wrapped = Schema::from_json(
            r#"{"fields": [{"name": "id", "type": "uint8"}, {"name": "rate", "type": "money"}]}"#,
        );
        assert!(matches!(
            wrapped,
            Err(FormError::UnknownFieldType { type_name }) if type_name == "money"
        ));
    }

    #[test]
    fn test_schema_from_json_malformed_document() {
        let result = Schema::from_json(r#"[{"type": "string"}]"#);
        assert!(matches!(result, Err(FormError::InvalidSchema(_))));
        assert!(matches!(
            Schema::from_json("{"),
            Err(FormError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_schema_from_json_rejects_duplicates() {
        let result = Schema::from_json(r#"[{"name": "a"}, {"name": "a"}]"#);
        match result {
            Err(FormError::DuplicateField { name }) => assert_eq!(name, "a"),
            other => panic!("expected DuplicateField, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_and_lookup() {
        let schema = Schema::default()
            .field(FieldDescriptor::new("name", FieldType::String).required().with_default("John"))
            .field(FieldDescriptor::new("avatar", FieldType::File));

        assert_eq!(schema.position("avatar"), Some(1));
        assert_eq!(schema.position("missing"), None);
        assert_eq!(schema.first_file_field().map(|f| f.name.as_str()), Some("avatar"));
        assert!(schema.fields[0].require_validation);
        assert_eq!(schema.fields[0].default, "John");
    }
}
