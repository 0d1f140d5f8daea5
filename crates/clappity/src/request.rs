// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP request abstraction.
//!
//! A platform-agnostic request type the server adapter fills in before
//! handing the request to middleware and route handlers. The body is
//! already fully buffered.

use std::collections::HashMap;

use crate::body::{self, BodyParseError};
use crate::context::DataContext;

/// A platform-agnostic HTTP request.
///
/// # Example
///
/// ```rust
/// use clappity::ClappityRequest;
///
/// let request = ClappityRequest::new("POST", "/login")
///     .with_body(b"user=ann".to_vec());
/// assert_eq!(request.body_str(), Some("user=ann"));
/// ```
#[derive(Debug, Clone)]
pub struct ClappityRequest {
    /// The HTTP method, upper case (e.g. "GET").
    pub method: String,

    /// The request path without query string (e.g. "/users/7").
    pub path: String,

    /// Parameters captured by the matched route pattern.
    pub params: HashMap<String, String>,

    /// Query parameters.
    pub query: HashMap<String, String>,

    /// HTTP headers, names lower case.
    pub headers: HashMap<String, String>,

    /// Buffered request body.
    pub body: Option<Vec<u8>>,
}

impl ClappityRequest {
    /// Creates a request. The path is cut at the first `?`; anything after
    /// it is parsed into [`query`](Self::query).
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p.to_string(), body::parse_query(q)),
            None => (path, HashMap::new()),
        };
        Self {
            method: method.into().to_ascii_uppercase(),
            path,
            params: HashMap::new(),
            query,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Replaces the headers. Names are lower-cased.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns a captured route parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the body as a string, if present and valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns the Content-Type header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Decodes the body as form fields or a JSON object, depending on
    /// the content type. An absent body yields an empty map.
    pub fn form(&self) -> Result<HashMap<String, String>, BodyParseError> {
        match &self.body {
            Some(bytes) => body::parse_fields(bytes, self.content_type()),
            None => Ok(HashMap::new()),
        }
    }

    /// Fills keys missing from `ctx` with request values.
    ///
    /// Keys already in `ctx` are kept. After them route parameters win,
    /// then query values, then decoded body fields.
    pub fn fill_context(&self, ctx: &mut DataContext) -> Result<(), BodyParseError> {
        let fields = self.form()?;
        for (k, v) in self.params.iter().chain(&self.query).chain(&fields) {
            ctx.insert_if_absent(k.clone(), v.clone());
        }
        Ok(())
    }
}

impl Default for ClappityRequest {
    fn default() -> Self {
        Self::new("GET", "/")
    }
}
