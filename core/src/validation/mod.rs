//! # FORM VALIDATION MODULE
//!
//! Walks submitted form values, matches them against a [`Schema`], coerces
//! each one to its declared type and aggregates per-field errors.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **PHASE 1** - Every submitted key is matched to its schema field,
//!    repeated values are joined, required/default policy is applied and
//!    the text is coerced.
//! 2. **PHASE 2** - Required fields that were never submitted are marked
//!    missing, then cross-field match constraints are checked.
//!
//! ## USAGE
//!
//! ```rust
//! use form_validator::request::{FormData, HttpMethod, HttpRequest, RequestBody};
//! use form_validator::types::{FieldDescriptor, FieldType, Schema};
//! use form_validator::validation::validate_form;
//!
//! let schema = Schema::default()
//!     .field(FieldDescriptor::new("age", FieldType::Uint8).required());
//! let request = HttpRequest::new(HttpMethod::POST, "/signup")
//!     .with_body(RequestBody::Form(FormData::new().with("age", "42")));
//!
//! let result = validate_form(&request, &schema).unwrap();
//! assert!(result.is_valid());
//! ```

use crate::errors::FormError;
use crate::request::HttpRequest;
use crate::types::Schema;

pub mod coerce;
pub mod result;
pub mod validators;

pub use coerce::{coerce, parse_bool, IncorrectType};
pub use result::{ErrorEntry, ErrorKind, FieldError, FieldState, ValidationResult};
pub use validators::{FormValidator, Submission};

/// Submitted text treated the same as an empty submission.
pub const NIL_PLACEHOLDER: &str = "<nil>";

/// **CORE VALIDATOR TRAIT**
///
/// Implementations consume one input and either produce a validated output
/// or fail with a caller-level [`FormError`]. Problems with the submitted
/// data itself belong in the output, not in the error.
pub trait Validator {
    type Input;
    type Output;

    /// Must not panic; every failure is reported through `FormError`.
    fn validate(&self, input: Self::Input) -> Result<Self::Output, FormError>;
}

/// How repeated values for one key are turned into a single string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MultiValuePolicy {
    /// Join with no separator.
    #[default]
    Concatenate,
    Separator(String),
    /// More than one value on a validated field is an incorrect type.
    Reject,
}

impl MultiValuePolicy {
    /// `None` when the policy rejects the values.
    pub fn join(&self, values: &[String]) -> Option<String> {
        match self {
            MultiValuePolicy::Concatenate => Some(values.concat()),
            MultiValuePolicy::Separator(sep) => Some(values.join(sep)),
            MultiValuePolicy::Reject if values.len() > 1 => None,
            MultiValuePolicy::Reject => Some(values.concat()),
        }
    }
}

/// Runtime knobs for a validation pass.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Largest request body accepted for parsing.
    pub max_body_size: usize,

    /// In-memory budget for multipart uploads.
    pub max_memory: usize,

    pub multi_value: MultiValuePolicy,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            max_body_size: 10_485_760, // 10MB
            max_memory: 32 << 20,
            multi_value: MultiValuePolicy::Concatenate,
        }
    }
}

impl ValidationContext {
    pub fn with_max_memory(mut self, max_memory: usize) -> Self {
        self.max_memory = max_memory;
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn with_multi_value(mut self, policy: MultiValuePolicy) -> Self {
        self.multi_value = policy;
        self
    }
}

/// Field error codes, as exposed by [`ErrorKind::code`].
pub mod error_codes {
    pub const MISSING_VALUE: &str = "ERROR_MISSING_VALUE";
    pub const INCORRECT_TYPE: &str = "ERROR_INCORRECT_TYPE";
    pub const FILE_TYPE: &str = "ERROR_FILE_TYPE";
    pub const FIELDS_DO_NOT_MATCH: &str = "ERROR_FIELDS_DO_NOT_MATCH";
}

/// Validate a urlencoded (or query-string) submission.
///
/// Fails with [`FormError::MultipartRequired`] when the schema declares a
/// `file` field; every problem with the submitted data is reported in the
/// returned [`ValidationResult`].
pub fn validate_form(
    request: &HttpRequest,
    schema: &Schema,
) -> Result<ValidationResult, FormError> {
    FormValidator::new(schema).validate_request(request)
}

/// Validate a multipart submission, buffering at most `max_memory` bytes of
/// uploaded files.
pub fn validate_multipart_form(
    request: &HttpRequest,
    max_memory: usize,
    schema: &Schema,
) -> Result<ValidationResult, FormError> {
    let context = ValidationContext::default().with_max_memory(max_memory);
    FormValidator::with_context(schema, context).validate_multipart_request(request)
}
