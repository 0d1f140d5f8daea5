// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP response abstraction.
//!
//! Route handlers and middleware return a [`ClappityResponse`]; the server
//! adapter converts it into its platform response.

/// Content type used for rendered templates.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A platform-agnostic HTTP response.
///
/// # Example
///
/// ```rust
/// use clappity::ClappityResponse;
///
/// let ok = ClappityResponse::html(200, "<h1>Hello</h1>");
/// assert_eq!(ok.header("content-type"), Some("text/html; charset=utf-8"));
///
/// let missing = ClappityResponse::not_found();
/// assert_eq!(missing.status, 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClappityResponse {
    /// HTTP status code.
    pub status: u16,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl ClappityResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Creates a `text/html` response.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body).with_header("content-type", HTML_CONTENT_TYPE)
    }

    /// Creates a `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body).with_header("content-type", "text/plain; charset=utf-8")
    }

    /// Creates a redirect (HTTP 302).
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(302, "").with_header("location", location)
    }

    /// The `404 Not Found` page.
    pub fn not_found() -> Self {
        Self::html(404, "<h1>404 Not Found</h1>")
    }

    /// The `405 Method Not Allowed` page.
    pub fn method_not_allowed() -> Self {
        Self::html(405, "<h1>405 Method Not Allowed</h1>")
    }

    /// An error page with the message HTML-escaped.
    pub fn error_page(status: u16, message: &str) -> Self {
        Self::html(
            status,
            format!(
                "<!DOCTYPE html>\n<html>\n<head><title>Error</title></head>\n<body>\n<h1>Error</h1>\n<pre>{}</pre>\n</body>\n</html>\n",
                html_escape(message)
            ),
        )
    }

    /// Adds a header, replacing any header with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        self.headers.retain(|(k, _)| *k != name);
        self.headers.push((name, value.into()));
        self
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
