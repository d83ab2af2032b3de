//! # TYPED ACCESSORS
//!
//! Re-project a validated field into a primitive type. Each getter renders
//! the stored value in its canonical text form and parses that text again,
//! so an `int8` field can be read back as `i64`, a `uint16` as `f32`, and so
//! on. Accessors never touch field state or error status.
//!
//! ```rust
//! # use form_validator::request::FormData;
//! # use form_validator::types::{FieldDescriptor, FieldType, Schema};
//! # use form_validator::validation::{FormValidator, Submission, Validator};
//! use form_validator::accessors::get_uint8;
//!
//! let schema = Schema::default().field(FieldDescriptor::new("age", FieldType::Uint8).required());
//! let submission = Submission::urlencoded(FormData::new().with("age", "42"));
//! let result = FormValidator::new(&schema).validate(submission).unwrap();
//!
//! assert_eq!(get_uint8("age", &result).unwrap(), 42);
//! ```

use crate::errors::FormError;
use crate::request::UploadedFile;
use crate::types::FieldValue;
use crate::validation::{parse_bool, ValidationResult};
use std::fmt::Display;
use std::str::FromStr;

fn stored_value<'r>(name: &str, result: &'r ValidationResult) -> Result<&'r FieldValue, FormError> {
    let value = result.value(name).ok_or_else(|| FormError::UnknownField {
        name: name.to_string(),
    })?;
    if value.is_unset() {
        return Err(FormError::ValueUnset {
            name: name.to_string(),
        });
    }
    Ok(value)
}

fn reparse<T>(name: &str, result: &ValidationResult, target: &'static str) -> Result<T, FormError>
where
    T: FromStr,
    T::Err: Display,
{
    let text = stored_value(name, result)?.to_string();
    text.parse::<T>().map_err(|e| FormError::Conversion {
        name: name.to_string(),
        target,
        message: e.to_string(),
    })
}

pub fn get_string(name: &str, result: &ValidationResult) -> Result<String, FormError> {
    Ok(stored_value(name, result)?.to_string())
}

/// Uses the same literal grammar as coercion, so `"1"` reads as `true`.
pub fn get_bool(name: &str, result: &ValidationResult) -> Result<bool, FormError> {
    let text = stored_value(name, result)?.to_string();
    parse_bool(&text).ok_or_else(|| FormError::Conversion {
        name: name.to_string(),
        target: "bool",
        message: format!("'{}' is not a boolean literal", text),
    })
}

pub fn get_int(name: &str, result: &ValidationResult) -> Result<isize, FormError> {
    reparse(name, result, "int")
}

pub fn get_int8(name: &str, result: &ValidationResult) -> Result<i8, FormError> {
    reparse(name, result, "int8")
}

pub fn get_int16(name: &str, result: &ValidationResult) -> Result<i16, FormError> {
    reparse(name, result, "int16")
}

pub fn get_int32(name: &str, result: &ValidationResult) -> Result<i32, FormError> {
    reparse(name, result, "int32")
}

pub fn get_int64(name: &str, result: &ValidationResult) -> Result<i64, FormError> {
    reparse(name, result, "int64")
}

pub fn get_uint(name: &str, result: &ValidationResult) -> Result<usize, FormError> {
    reparse(name, result, "uint")
}

pub fn get_uint8(name: &str, result: &ValidationResult) -> Result<u8, FormError> {
    reparse(name, result, "uint8")
}

pub fn get_uint16(name: &str, result: &ValidationResult) -> Result<u16, FormError> {
    reparse(name, result, "uint16")
}

pub fn get_uint32(name: &str, result: &ValidationResult) -> Result<u32, FormError> {
    reparse(name, result, "uint32")
}

pub fn get_uint64(name: &str, result: &ValidationResult) -> Result<u64, FormError> {
    reparse(name, result, "uint64")
}

pub fn get_float32(name: &str, result: &ValidationResult) -> Result<f32, FormError> {
    reparse(name, result, "float32")
}

pub fn get_float64(name: &str, result: &ValidationResult) -> Result<f64, FormError> {
    reparse(name, result, "float64")
}

pub fn get_file<'r>(name: &str, result: &'r ValidationResult) -> Result<&'r UploadedFile, FormError> {
    match stored_value(name, result)? {
        FieldValue::File(file) => Ok(file),
        other => Err(FormError::Conversion {
            name: name.to_string(),
            target: "file",
            message: format!("'{}' is not an uploaded file", other),
        }),
    }
}
