// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Types for the route table.

use std::collections::HashMap;
use std::sync::Arc;

use clappity::{ClappityRequest, ClappityResponse};

use crate::server::AppContext;

/// A route handler.
pub type Handler = Arc<dyn Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync>;

/// A registered path pattern and its handlers keyed by method.
#[derive(Clone)]
pub struct Route {
    /// The URL pattern in matchit format (e.g., "/users/{id}")
    pub pattern: String,

    /// Handlers keyed by upper-case method
    pub handlers: HashMap<String, Handler>,
}

impl Route {
    /// Returns the registered methods, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("methods", &self.methods())
            .finish()
    }
}

/// Result of looking up a request in the route table
pub enum Lookup<'a> {
    /// A handler is registered for the method and path.
    Found {
        /// The matched handler
        handler: &'a Handler,
        /// URL parameters extracted from the path
        params: Vec<(String, String)>,
    },

    /// The path is known but not for this method.
    MethodNotAllowed,

    /// No pattern matches the path.
    NotFound,
}

impl std::fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Found { params, .. } => {
                f.debug_struct("Found").field("params", params).finish()
            }
            Lookup::MethodNotAllowed => f.write_str("MethodNotAllowed"),
            Lookup::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Errors from the routing system
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Invalid route pattern syntax, or a pattern that conflicts with
    /// one already registered.
    #[error("Invalid route pattern {pattern}: {message}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Why matchit rejected it
        message: String,
    },

    /// A method name that is empty or contains non-token characters.
    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),
}

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_methods_sorted() {
        let handler: Handler =
            Arc::new(|_: &AppContext, _: &ClappityRequest| ClappityResponse::html(200, ""));
        let route = Route {
            pattern: "/".to_string(),
            handlers: [
                ("POST".to_string(), handler.clone()),
                ("GET".to_string(), handler),
            ]
            .into(),
        };
        assert_eq!(route.methods(), vec!["GET", "POST"]);
        assert_eq!(
            format!("{:?}", route),
            r#"Route { pattern: "/", methods: ["GET", "POST"] }"#
        );
    }

    #[test]
    fn test_error_messages() {
        let err = RoutingError::InvalidMethod("G ET".to_string());
        assert_eq!(err.to_string(), r#"Invalid HTTP method: "G ET""#);
    }
}
