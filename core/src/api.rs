pub use crate::accessors::{
    get_bool, get_file, get_float32, get_float64, get_int, get_int16, get_int32, get_int64,
    get_int8, get_string, get_uint, get_uint16, get_uint32, get_uint64, get_uint8,
};
pub use crate::request::{FormData, HttpMethod, HttpRequest, MultipartForm, RequestBody, UploadedFile};
pub use crate::types::{FieldDescriptor, FieldType, FieldValue, Schema};
pub use crate::validation::{
    validate_form, validate_multipart_form, ErrorEntry, ErrorKind, FieldError, FieldState,
    ValidationContext, ValidationResult,
};

use crate::errors::FormError;

/// Error of the named field; empty when the field is absent or valid.
pub fn get_field_error(name: &str, result: &ValidationResult) -> FieldError {
    result.field_error(name)
}

/// Every field currently in error, as `{name, message}` pairs.
pub fn get_all_field_errors(result: &ValidationResult) -> Vec<ErrorEntry> {
    result.all_field_errors()
}

/// Load a schema from its JSON description.
pub fn load_schema(json: &str) -> Result<Schema, FormError> {
    Schema::from_json(json)
}
