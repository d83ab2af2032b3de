use crate::errors::FormError;
use crate::request::types::FormData;

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

/// Decode `a=1&a=2&b` into form values. Repeated keys keep every value in
/// order; a key without `=` maps to the empty string.
pub fn parse_query_string(query: &str) -> FormData {
    let mut form = FormData::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match (decode_component(key), decode_component(value)) {
            (Some(key), Some(value)) => form.append(key, value),
            _ => log::debug!("skipping undecodable form pair '{}'", pair),
        }
    }
    form
}

pub fn parse_form_body(data: &[u8]) -> Result<FormData, FormError> {
    let body_str = std::str::from_utf8(data)?;
    Ok(parse_query_string(body_str))
}

/// Reject bodies larger than `limit` bytes.
pub fn check_body_size(data: &[u8], limit: usize) -> Result<(), FormError> {
    if data.len() > limit {
        Err(FormError::BodyTooLarge {
            size: data.len(),
            limit,
        })
    } else {
        Ok(())
    }
}
