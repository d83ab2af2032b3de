use thiserror::Error;

/// Caller-level failures.
///
/// Field-scoped problems (missing values, bad types, failed uploads,
/// mismatched fields) never surface here; they are recorded on the
/// field inside a [`crate::validation::ValidationResult`].
#[derive(Debug, Error)]
pub enum FormError {
    #[error("schema field '{field}' has type file; use validate_multipart_form")]
    MultipartRequired { field: String },

    #[error("no field named '{name}' in form")]
    UnknownField { name: String },

    #[error("field '{name}' has no value")]
    ValueUnset { name: String },

    #[error("cannot convert field '{name}' to {target}: {message}")]
    Conversion {
        name: String,
        target: &'static str,
        message: String,
    },

    #[error("unknown field type '{type_name}'")]
    UnknownFieldType { type_name: String },

    #[error("duplicate field name '{name}' in schema")]
    DuplicateField { name: String },

    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),

    #[error("invalid UTF-8 in form body: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("body size {size} exceeds limit {limit}")]
    BodyTooLarge { size: usize, limit: usize },

    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("file '{name}' of {size} bytes exceeds in-memory limit {limit}")]
    FileTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
}

impl FormError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            FormError::MultipartRequired { .. } => "FORM_MULTIPART_REQUIRED",
            FormError::UnknownField { .. } => "FORM_UNKNOWN_FIELD",
            FormError::ValueUnset { .. } => "FORM_VALUE_UNSET",
            FormError::Conversion { .. } => "FORM_CONVERSION",
            FormError::UnknownFieldType { .. } => "FORM_SCHEMA_UNKNOWN_TYPE",
            FormError::DuplicateField { .. } => "FORM_SCHEMA_DUPLICATE_FIELD",
            FormError::InvalidSchema(_) => "FORM_SCHEMA_INVALID",
            FormError::InvalidUtf8(_) => "FORM_REQUEST_INVALID_UTF8",
            FormError::BodyTooLarge { .. } => "FORM_REQUEST_BODY_TOO_LARGE",
            FormError::MalformedRequest { .. } => "FORM_REQUEST_MALFORMED",
            FormError::FileTooLarge { .. } => "FORM_REQUEST_FILE_TOO_LARGE",
        }
    }
}
