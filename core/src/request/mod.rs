pub mod parser;
pub mod types;

pub use parser::{check_body_size, parse_form_body, parse_query_string};
pub use types::{FormData, HttpMethod, HttpRequest, MultipartForm, RequestBody, UploadedFile};
