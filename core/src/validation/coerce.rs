//! # COERCION ENGINE
//!
//! Converts submitted text into a [`FieldValue`] according to the declared
//! [`FieldType`]. Integer targets are range-checked at their exact width;
//! nothing is truncated.

use crate::types::{FieldType, FieldValue};
use std::str::FromStr;
use thiserror::Error;

/// The submitted text does not parse as the declared type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{input}' is not a valid {field_type} value")]
pub struct IncorrectType {
    pub field_type: FieldType,
    pub input: String,
}

/// Boolean literal grammar shared by coercion and the accessors.
///
/// Case-insensitive `true`/`false`, `t`/`f` and the numerals `1`/`0`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a float, rejecting finite text that overflows to infinity.
pub fn parse_float<T>(text: &str) -> Option<T>
where
    T: FromStr + Into<f64> + Copy,
{
    let value = text.parse::<T>().ok()?;
    let overflowed = value.into().is_infinite() && !text.to_ascii_lowercase().contains("inf");
    (!overflowed).then_some(value)
}

fn int<T: FromStr>(text: &str) -> Option<T> {
    text.parse::<T>().ok()
}

/// Coerce `input` into a value of `field_type`.
///
/// `String` and `Untyped` never fail. `File` values are not text and come
/// from the multipart collaborator instead, so they are always rejected here.
pub fn coerce(field_type: FieldType, input: &str) -> Result<FieldValue, IncorrectType> {
    let value = match field_type {
        FieldType::Untyped | FieldType::String => Some(FieldValue::String(input.to_string())),
        FieldType::Bool => parse_bool(input).map(FieldValue::Bool),
        FieldType::Int => int(input).map(FieldValue::Int),
        FieldType::Int8 => int(input).map(FieldValue::Int8),
        FieldType::Int16 => int(input).map(FieldValue::Int16),
        FieldType::Int32 => int(input).map(FieldValue::Int32),
        FieldType::Int64 => int(input).map(FieldValue::Int64),
        FieldType::Uint => int(input).map(FieldValue::Uint),
        FieldType::Uint8 => int(input).map(FieldValue::Uint8),
        FieldType::Uint16 => int(input).map(FieldValue::Uint16),
        FieldType::Uint32 => int(input).map(FieldValue::Uint32),
        FieldType::Uint64 => int(input).map(FieldValue::Uint64),
        FieldType::Float32 => parse_float(input).map(FieldValue::Float32),
        FieldType::Float64 => parse_float(input).map(FieldValue::Float64),
        FieldType::File => None,
    };

    value.ok_or_else(|| IncorrectType {
        field_type,
        input: input.to_string(),
    })
}
