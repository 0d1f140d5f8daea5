// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request body and query string parsing helpers.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// Errors that can occur while parsing a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    /// The body claimed to be JSON but is not.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// The JSON body is not a flat object.
    #[error("Expected a JSON object of scalar values")]
    NotAnObject,
}

/// Parses a query string into a map. Later duplicates win.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Parses a body into named fields.
///
/// JSON bodies must be objects; scalar members are converted to text and
/// other members are skipped. Anything else is treated as
/// `application/x-www-form-urlencoded`.
pub fn parse_fields(
    body: &[u8],
    content_type: Option<&str>,
) -> Result<HashMap<String, String>, BodyParseError> {
    let content_type = content_type.unwrap_or("");

    if content_type.contains("application/json") {
        let value: JsonValue = serde_json::from_slice(body)
            .map_err(|e| BodyParseError::InvalidJson(e.to_string()))?;
        let JsonValue::Object(map) = value else {
            return Err(BodyParseError::NotAnObject);
        };
        return Ok(map
            .into_iter()
            .filter_map(|(k, v)| match v {
                JsonValue::String(s) => Some((k, s)),
                JsonValue::Bool(b) => Some((k, b.to_string())),
                JsonValue::Number(n) => Some((k, n.to_string())),
                _ => None,
            })
            .collect());
    }

    Ok(form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("foo=bar&baz=qux&=skip&flag");
        assert_eq!(params.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(params.get("baz").map(String::as_str), Some("qux"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_parse_form_urlencoded() {
        let fields = parse_fields(
            b"name=John&email=john%40example.com",
            Some("application/x-www-form-urlencoded"),
        )
        .unwrap();
        assert_eq!(fields["name"], "John");
        assert_eq!(fields["email"], "john@example.com");
    }

    #[test]
    fn test_parse_json() {
        let fields = parse_fields(
            br#"{"name": "John", "age": 30, "tags": ["x"]}"#,
            Some("application/json"),
        )
        .unwrap();
        assert_eq!(fields["name"], "John");
        assert_eq!(fields["age"], "30");
        assert!(!fields.contains_key("tags"));
    }

    #[test]
    fn test_parse_json_errors() {
        assert!(matches!(
            parse_fields(b"{oops", Some("application/json")),
            Err(BodyParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_fields(b"[1]", Some("application/json")),
            Err(BodyParseError::NotAnObject)
        ));
    }
}
