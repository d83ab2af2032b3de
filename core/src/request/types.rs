use crate::errors::FormError;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    TRACE,
}

impl HttpMethod {
    /// Methods whose body contributes form values.
    pub fn carries_form_body(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

impl FromStr for HttpMethod {
    type Err = FormError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "TRACE" => Ok(HttpMethod::TRACE),
            _ => Err(FormError::MalformedRequest {
                message: format!("Invalid HTTP method: {}", method),
            }),
        }
    }
}

/// Parsed form values: field name to submitted values, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, Vec<String>)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping earlier values for the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builder form of [`FormData::append`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Append every value of `other` after the values already held.
    pub fn extend_from(&mut self, other: &FormData) {
        for (key, values) in other.iter() {
            for value in values {
                self.append(key, value.as_str());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (key, value) in iter {
            form.append(key, value);
        }
        form
    }
}

/// An uploaded file held in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FilePart {
    Stored(UploadedFile),
    /// Upload dropped because it would exceed the in-memory budget.
    Rejected { size: usize, limit: usize },
}

/// Parsed `multipart/form-data` submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub values: FormData,
    files: Vec<(String, FilePart)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.push((name.into(), FilePart::Stored(file)));
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.add_file(name, file);
        self
    }

    pub(crate) fn add_rejected(&mut self, name: impl Into<String>, size: usize, limit: usize) {
        self.files
            .push((name.into(), FilePart::Rejected { size, limit }));
    }

    /// Retrieve the first file uploaded under `name`.
    ///
    /// `Ok(None)` means no file was submitted for that name.
    pub fn file(&self, name: &str) -> Result<Option<&UploadedFile>, FormError> {
        match self.files.iter().find(|(n, _)| n == name) {
            None => Ok(None),
            Some((_, FilePart::Stored(file))) => Ok(Some(file)),
            Some((_, FilePart::Rejected { size, limit })) => Err(FormError::FileTooLarge {
                name: name.to_string(),
                size: *size,
                limit: *limit,
            }),
        }
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    /// Bytes held by stored uploads.
    pub fn stored_bytes(&self) -> usize {
        self.files
            .iter()
            .map(|(_, part)| match part {
                FilePart::Stored(file) => file.size(),
                FilePart::Rejected { .. } => 0,
            })
            .sum()
    }

    /// Bound the uploads held in memory.
    ///
    /// Uploads are admitted in submission order while their combined size
    /// stays within `max_memory`. An upload that would exceed the budget is
    /// replaced so that retrieving it fails with [`FormError::FileTooLarge`].
    pub fn within_memory(&self, max_memory: usize) -> Cow<'_, MultipartForm> {
        if self.stored_bytes() <= max_memory {
            return Cow::Borrowed(self);
        }

        let mut bounded = MultipartForm {
            values: self.values.clone(),
            files: Vec::with_capacity(self.files.len()),
        };
        let mut in_memory = 0usize;
        for (name, part) in &self.files {
            match part {
                FilePart::Stored(file) if in_memory + file.size() <= max_memory => {
                    in_memory += file.size();
                    bounded.files.push((name.clone(), part.clone()));
                }
                FilePart::Stored(file) => {
                    log::warn!(
                        "upload '{}' ({} bytes) exceeds in-memory limit {}",
                        name,
                        file.size(),
                        max_memory
                    );
                    bounded.add_rejected(name.as_str(), file.size(), max_memory);
                }
                FilePart::Rejected { .. } => bounded.files.push((name.clone(), part.clone())),
            }
        }
        Cow::Owned(bounded)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(FormData),
    Multipart(MultipartForm),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query_params: FormData,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            query_params: FormData::new(),
            body: RequestBody::Empty,
        }
    }

    /// Build a request from a raw request target such as `/signup?ref=mail`.
    pub fn from_target(method: &str, target: &str) -> Result<Self, FormError> {
        let method = method.parse()?;
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let mut request = Self::new(method, path);
        request.query_params = super::parse_query_string(query);
        Ok(request)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type of the body without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        self.header("Content-Type").map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}
