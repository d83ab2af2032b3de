//! # FORM VALIDATOR
//!
//! **SCHEMA-DRIVEN VALIDATION AND TYPE COERCION FOR HTTP FORMS**
//!
//! **ARCHITECTURE**: Immutable schema in, fresh per-field result out
//! **GUARANTEE**: Submitted data never fails a call; only API misuse does
//! **COVERAGE**: bool, signed/unsigned integers of every width, floats, strings, files

pub mod accessors;
pub mod api;
pub mod errors;
pub mod request;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;
