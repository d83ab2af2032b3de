//! # TWO-PHASE FORM VALIDATOR
//!
//! [`FormValidator`] borrows an immutable [`Schema`] and turns a
//! [`Submission`] into a fresh [`ValidationResult`]. Nothing is written back
//! into the schema, so one validator can serve any number of requests.

use super::coerce::coerce;
use super::result::{FieldError, FieldState, ValidationResult};
use super::{ValidationContext, Validator, NIL_PLACEHOLDER};
use crate::errors::FormError;
use crate::request::{
    check_body_size, parse_form_body, FormData, HttpRequest, MultipartForm, RequestBody,
};
use crate::types::{FieldDescriptor, FieldType, FieldValue, Schema};
use std::borrow::Cow;
use std::collections::HashMap;

const URLENCODED: &str = "application/x-www-form-urlencoded";

// ================================================================================================
// SUBMISSION - Form values and uploads resolved from a request
// ================================================================================================

/// Everything a client submitted for one validation pass.
///
/// `files` is `None` for urlencoded submissions; a schema with `file`
/// fields can only be validated against a multipart submission.
#[derive(Debug, Clone)]
pub struct Submission<'a> {
    pub values: FormData,
    pub files: Option<Cow<'a, MultipartForm>>,
}

impl<'a> Submission<'a> {
    pub fn urlencoded(values: FormData) -> Self {
        Self {
            values,
            files: None,
        }
    }

    pub fn multipart(form: &'a MultipartForm) -> Self {
        Self {
            values: form.values.clone(),
            files: Some(Cow::Borrowed(form)),
        }
    }

    /// Resolve the values of a urlencoded request: body values for
    /// POST/PUT/PATCH first, then query-string values.
    pub fn from_request(request: &HttpRequest, context: &ValidationContext) -> Self {
        let mut values = FormData::new();
        if let Some(body) = urlencoded_body(request, context) {
            values.extend_from(&body);
        }
        values.extend_from(&request.query_params);
        Self::urlencoded(values)
    }

    /// Resolve a multipart request. Query-string values come first, then
    /// the text parts of the decoded body. Uploads past
    /// `context.max_memory` fail retrieval with
    /// [`FormError::FileTooLarge`].
    pub fn from_multipart_request(request: &'a HttpRequest, context: &ValidationContext) -> Self {
        let mut values = request.query_params.clone();
        let files = match &request.body {
            RequestBody::Multipart(form) if request.method.carries_form_body() => {
                values.extend_from(&form.values);
                form.within_memory(context.max_memory)
            }
            _ => {
                if let Some(body) = urlencoded_body(request, context) {
                    values.extend_from(&body);
                }
                Cow::Owned(MultipartForm::new())
            }
        };

        Self {
            values,
            files: Some(files),
        }
    }

    /// Submitted keys with their raw values. File-only parts appear with
    /// no text values.
    fn keys(&self) -> Vec<(&str, &[String])> {
        let mut keys: Vec<(&str, &[String])> = self.values.iter().collect();
        if let Some(files) = &self.files {
            for name in files.file_names() {
                if !keys.iter().any(|(key, _)| *key == name) {
                    keys.push((name, &[]));
                }
            }
        }
        keys
    }
}

fn urlencoded_body(request: &HttpRequest, context: &ValidationContext) -> Option<FormData> {
    if !request.method.carries_form_body() {
        return None;
    }
    match &request.body {
        RequestBody::Form(form) => Some(form.clone()),
        RequestBody::Raw(bytes) if request.media_type().as_deref() == Some(URLENCODED) => {
            let parsed =
                check_body_size(bytes, context.max_body_size).and_then(|_| parse_form_body(bytes));
            match parsed {
                Ok(form) => Some(form),
                Err(err) => {
                    log::warn!("ignoring unreadable form body: {}", err);
                    None
                }
            }
        }
        RequestBody::Raw(_) => {
            log::warn!(
                "ignoring undecoded body of type {:?}",
                request.media_type().unwrap_or_default()
            );
            None
        }
        _ => None,
    }
}

// ================================================================================================
// FORM VALIDATOR
// ================================================================================================

#[derive(Debug, Clone)]
pub struct FormValidator<'a> {
    schema: &'a Schema,
    context: ValidationContext,
}

impl<'a> FormValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_context(schema, ValidationContext::default())
    }

    pub fn with_context(schema: &'a Schema, context: ValidationContext) -> Self {
        Self { schema, context }
    }

    pub fn validate_request(&self, request: &HttpRequest) -> Result<ValidationResult, FormError> {
        self.validate(Submission::from_request(request, &self.context))
    }

    pub fn validate_multipart_request(
        &self,
        request: &'a HttpRequest,
    ) -> Result<ValidationResult, FormError> {
        self.validate(Submission::from_multipart_request(request, &self.context))
    }

    /// First schema index for every field name.
    fn index_by_name(&self) -> HashMap<&'a str, usize> {
        let mut index = HashMap::with_capacity(self.schema.len());
        for (i, field) in self.schema.fields.iter().enumerate() {
            index.entry(field.name.as_str()).or_insert(i);
        }
        index
    }

    /// Phase 1 for a single submitted key.
    ///
    /// A field without `require_validation` keeps the submitted text as a
    /// string, whatever its declared type; this includes `file` fields.
    fn apply_submission(
        &self,
        descriptor: &FieldDescriptor,
        state: &mut FieldState,
        raw: &[String],
        files: Option<&MultipartForm>,
    ) {
        let text = self.context.multi_value.join(raw);
        state.initial = text.clone().unwrap_or_else(|| raw.concat());

        if !descriptor.require_validation {
            state.value = FieldValue::String(state.initial.clone());
            return;
        }

        if descriptor.field_type == FieldType::File {
            match files.map(|f| f.file(&descriptor.name)) {
                Some(Ok(Some(file))) => {
                    state.initial = file.filename.clone();
                    state.value = FieldValue::File(file.clone());
                }
                Some(Ok(None)) | None => {
                    state.error = FieldError::missing_value(&descriptor.name);
                }
                Some(Err(err)) => {
                    log::warn!("file field '{}' unavailable: {}", descriptor.name, err);
                    state.error = FieldError::file(&err);
                }
            }
            return;
        }

        let Some(text) = text else {
            log::trace!(
                "field '{}' rejected: {} values submitted",
                descriptor.name,
                raw.len()
            );
            state.error = FieldError::incorrect_type(descriptor.field_type, &descriptor.name);
            return;
        };

        if text.is_empty() || text == NIL_PLACEHOLDER {
            state.error = FieldError::missing_value(&descriptor.name);
            if !descriptor.default.is_empty() {
                if let Ok(value) = coerce(descriptor.field_type, &descriptor.default) {
                    state.value = value;
                }
            }
            return;
        }

        match coerce(descriptor.field_type, &text) {
            Ok(value) => state.value = value,
            Err(err) => {
                log::trace!("field '{}': {}", descriptor.name, err);
                state.error = FieldError::incorrect_type(descriptor.field_type, &descriptor.name);
            }
        }
    }

    /// Phase 2: unresolved required fields, then match constraints.
    fn finalize(&self, states: &mut [FieldState], index: &HashMap<&str, usize>) {
        for (state, descriptor) in states.iter_mut().zip(&self.schema.fields) {
            if descriptor.require_validation && state.value.is_unset() && state.error.is_empty() {
                state.error = FieldError::missing_value(&descriptor.name);
            }
        }

        for (i, descriptor) in self.schema.fields.iter().enumerate() {
            let Some(target) = descriptor.match_target.as_deref() else {
                continue;
            };
            if !states[i].error.is_empty() {
                continue;
            }
            let matches = match index.get(target) {
                Some(&t) => states[t].value == states[i].value,
                None => states[i].value.is_unset(),
            };
            if !matches {
                log::trace!("field '{}' does not match '{}'", descriptor.name, target);
                states[i].error = FieldError::mismatch(&descriptor.name, target);
            }
        }
    }
}

impl<'a> Validator for FormValidator<'a> {
    type Input = Submission<'a>;
    type Output = ValidationResult;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, FormError> {
        // **STEP 1**: A file field needs the multipart entry point
        let files = input.files.as_deref();
        if files.is_none() {
            if let Some(field) = self.schema.first_file_field() {
                log::error!(
                    "schema field '{}' is a file but the form is not multipart",
                    field.name
                );
                return Err(FormError::MultipartRequired {
                    field: field.name.clone(),
                });
            }
        }

        let mut states: Vec<FieldState> =
            self.schema.fields.iter().map(FieldState::pending).collect();

        // **STEP 2**: Nothing submitted at all
        let keys = input.keys();
        if keys.is_empty() {
            log::debug!(
                "empty submission; marking {} fields missing",
                self.schema.len()
            );
            for state in &mut states {
                state.error = FieldError::missing_value(&state.name);
            }
            return Ok(ValidationResult::new(states));
        }

        // **STEP 3**: Phase 1, per submitted key
        let index = self.index_by_name();
        for (key, raw) in keys {
            match index.get(key) {
                Some(&i) => self.apply_submission(&self.schema.fields[i], &mut states[i], raw, files),
                None => log::trace!("ignoring form key '{}' not in schema", key),
            }
        }

        // **STEP 4**: Phase 2, per schema field
        self.finalize(&mut states, &index);

        let result = ValidationResult::new(states);
        log::debug!(
            "validated {} fields, {} in error",
            self.schema.len(),
            result.all_field_errors().len()
        );
        Ok(result)
    }
}
