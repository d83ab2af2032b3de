use form_validator::api::*;
use form_validator::errors::FormError;
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn urlencoded_post(body: &str) -> HttpRequest {
    HttpRequest::from_target("POST", "/signup")
        .unwrap()
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(RequestBody::Raw(body.as_bytes().to_vec()))
}

/// A multipart request as the web framework hands it over: text parts as
/// values, parts with a filename as uploads.
fn multipart_post(parts: &[(&str, Option<&str>, &str)]) -> HttpRequest {
    let mut form = MultipartForm::new();
    for (name, filename, content) in parts {
        match filename {
            Some(filename) if !filename.is_empty() => form.add_file(
                *name,
                UploadedFile::new(*filename, "text/plain", content.as_bytes().to_vec()),
            ),
            _ => form.values.append(*name, *content),
        }
    }

    HttpRequest::from_target("POST", "/upload")
        .unwrap()
        .with_header(
            "Content-Type",
            "multipart/form-data; boundary=FormBoundary7MA4YWxk",
        )
        .with_body(RequestBody::Multipart(form))
}

fn signup_schema() -> Schema {
    load_schema(
        r#"{"fields": [
            {"name": "name", "type": "string", "requireValidation": true, "default": "John"},
            {"name": "email", "type": "string"},
            {"name": "age", "type": "uint8", "requireValidation": true},
            {"name": "newsletter", "type": "bool", "requireValidation": true, "default": "false"},
            {"name": "password", "type": "string", "requireValidation": true},
            {"name": "confirm_password", "type": "string", "requireValidation": true, "matchTarget": "password"}
        ]}"#,
    )
    .unwrap()
}

#[test]
fn test_signup_form_valid() {
    init_logging();
    let request = urlencoded_post(
        "name=Joe&email=joe%40email.com&age=42&newsletter=TRUE&password=wizard&confirm_password=wizard",
    );

    let result = validate_form(&request, &signup_schema()).unwrap();
    assert!(result.is_valid(), "{:?}", result.all_field_errors());
    assert_eq!(get_string("email", &result).unwrap(), "joe@email.com");
    assert_eq!(get_uint8("age", &result).unwrap(), 42);
    assert!(get_bool("newsletter", &result).unwrap());
    assert_eq!(result.form_errors(), json!({}));
}

#[test]
fn test_signup_form_errors() {
    init_logging();
    let request =
        urlencoded_post("name=&email=&age=300&newsletter=&password=wizard&confirm_password=blizzard");

    let result = validate_form(&request, &signup_schema()).unwrap();
    assert!(!result.is_valid());

    let errors = get_all_field_errors(&result);
    let names: Vec<&str> = errors.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["name", "age", "newsletter", "confirm_password"]);

    assert_eq!(get_field_error("name", &result).kind, Some(ErrorKind::MissingValue));
    assert_eq!(get_string("name", &result).unwrap(), "John");
    assert_eq!(get_field_error("age", &result).kind, Some(ErrorKind::IncorrectType));
    assert!(!get_bool("newsletter", &result).unwrap());
    assert_eq!(
        get_field_error("confirm_password", &result).kind,
        Some(ErrorKind::FieldsDoNotMatch)
    );
    assert!(get_field_error("email", &result).is_empty());

    assert_eq!(
        result.form_errors()["age"],
        json!({"age": "age", "error": "Expected a value of type uint8 for age field"})
    );
}

#[test]
fn test_query_string_only_submission() {
    init_logging();
    let schema = Schema::default().field(FieldDescriptor::new("page", FieldType::Uint32).required());
    let request = HttpRequest::from_target("GET", "/search?page=3").unwrap();

    let result = validate_form(&request, &schema).unwrap();
    assert_eq!(get_uint32("page", &result).unwrap(), 3);
}

#[test]
fn test_empty_request_marks_everything_missing() {
    init_logging();
    let request = urlencoded_post("");
    let result = validate_form(&request, &signup_schema()).unwrap();

    assert!(!result.is_valid());
    assert_eq!(get_all_field_errors(&result).len(), 6);
}

#[test]
fn test_multipart_upload() {
    init_logging();
    let schema = Schema::default()
        .field(FieldDescriptor::new("title", FieldType::String).required())
        .field(FieldDescriptor::new("attachment", FieldType::File).required());
    let request = multipart_post(&[
        ("title", None, "Quarterly report"),
        ("attachment", Some("report.txt"), "all numbers up"),
    ]);

    let result = validate_multipart_form(&request, 1024, &schema).unwrap();
    assert!(result.is_valid(), "{:?}", result.all_field_errors());
    assert_eq!(get_string("title", &result).unwrap(), "Quarterly report");

    let file = get_file("attachment", &result).unwrap();
    assert_eq!(file.filename, "report.txt");
    assert_eq!(file.content_type, "text/plain");
    assert_eq!(file.data, b"all numbers up");
}

#[test]
fn test_multipart_upload_over_memory_limit() {
    init_logging();
    let schema = Schema::default().field(FieldDescriptor::new("attachment", FieldType::File).required());
    let request = multipart_post(&[("attachment", Some("big.txt"), "0123456789")]);

    let result = validate_multipart_form(&request, 4, &schema).unwrap();
    let err = get_field_error("attachment", &result);
    assert_eq!(err.kind, Some(ErrorKind::FileType));
    assert!(err.message.starts_with("File error:"));
}

#[test]
fn test_multipart_without_file() {
    init_logging();
    let schema = Schema::default()
        .field(FieldDescriptor::new("title", FieldType::String).required())
        .field(FieldDescriptor::new("attachment", FieldType::File).required());
    let request = multipart_post(&[("title", None, "Notes"), ("attachment", Some(""), "")]);

    let result = validate_multipart_form(&request, 1024, &schema).unwrap();
    assert_eq!(
        get_field_error("attachment", &result).kind,
        Some(ErrorKind::MissingValue)
    );
}

#[test]
fn test_file_schema_with_urlencoded_entry_point() {
    init_logging();
    let schema = Schema::default().field(FieldDescriptor::new("attachment", FieldType::File));
    let result = validate_form(&urlencoded_post("attachment=x"), &schema);

    match result {
        Err(err @ FormError::MultipartRequired { .. }) => {
            assert_eq!(err.code(), "FORM_MULTIPART_REQUIRED");
        }
        other => panic!("expected MultipartRequired, got {:?}", other),
    }
}

#[test]
fn test_schema_reused_across_requests() {
    init_logging();
    let schema = signup_schema();
    let before = schema.clone();

    let bad = validate_form(&urlencoded_post("age=abc"), &schema).unwrap();
    let good = validate_form(
        &urlencoded_post("name=Ann&age=30&newsletter=0&password=x&confirm_password=x"),
        &schema,
    )
    .unwrap();

    assert!(!bad.is_valid());
    assert!(good.is_valid(), "{:?}", good.all_field_errors());
    assert_eq!(schema, before);
}

#[test]
fn test_result_serializes_to_json() {
    init_logging();
    let schema = Schema::default()
        .field(FieldDescriptor::new("age", FieldType::Uint8).required())
        .field(FieldDescriptor::new("name", FieldType::String).required());
    let result = validate_form(&urlencoded_post("age=7"), &schema).unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "fields": [
                {
                    "name": "age",
                    "type": "uint8",
                    "initial": "7",
                    "value": 7,
                    "error": {"type": null, "message": ""}
                },
                {
                    "name": "name",
                    "type": "string",
                    "initial": "",
                    "value": null,
                    "error": {"type": "ERROR_MISSING_VALUE", "message": "Missing value for name field"}
                }
            ]
        })
    );
}
