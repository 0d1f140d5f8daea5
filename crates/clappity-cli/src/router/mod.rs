// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Method and path route table.
//!
//! This module provides:
//! - Registration of handlers by HTTP method and path pattern
//! - Dynamic segments with `{param}` and catch-alls with `{*rest}`
//! - URL pattern matching using matchit
//! - Distinguishing unknown paths from unsupported methods

pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use clappity::{ClappityRequest, ClappityResponse};
use matchit::Router as MatchitRouter;

use crate::server::AppContext;

pub use types::{Handler, Lookup, Route, RoutingError, RoutingResult};

/// Routes keyed by path pattern, each holding one handler per method.
pub struct RouteTable {
    /// matchit router for fast URL matching
    matcher: MatchitRouter<usize>,

    /// All registered routes (indexed by matcher)
    routes: Vec<Route>,

    /// Pattern to index, for re-registration
    by_pattern: HashMap<String, usize>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            matcher: MatchitRouter::new(),
            routes: Vec::new(),
            by_pattern: HashMap::new(),
        }
    }

    /// Registers a handler for a method and path pattern.
    ///
    /// Registering the same method and pattern again replaces the
    /// earlier handler.
    pub fn route<F>(&mut self, method: &str, path: &str, handler: F) -> RoutingResult<()>
    where
        F: Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync + 'static,
    {
        self.insert(method, path, Arc::new(handler))
    }

    /// Registers an already shared handler.
    pub fn insert(&mut self, method: &str, path: &str, handler: Handler) -> RoutingResult<()> {
        let method = normalize_method(method)?;
        let pattern = normalize_path(path);
        if !pattern.starts_with('/') {
            return Err(RoutingError::InvalidPattern {
                pattern,
                message: "patterns must start with '/'".to_string(),
            });
        }

        let index = match self.by_pattern.get(&pattern) {
            Some(&index) => index,
            None => {
                let index = self.routes.len();
                self.matcher
                    .insert(pattern.clone(), index)
                    .map_err(|e| RoutingError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                self.routes.push(Route {
                    pattern: pattern.clone(),
                    handlers: HashMap::new(),
                });
                self.by_pattern.insert(pattern.clone(), index);
                index
            }
        };

        tracing::info!("Route registered: [{}] {}", method, pattern);
        if self.routes[index].handlers.insert(method.clone(), handler).is_some() {
            tracing::debug!("Replaced handler for [{}] {}", method, pattern);
        }
        Ok(())
    }

    /// Looks up the handler for a method and request path.
    pub fn lookup(&self, method: &str, path: &str) -> Lookup<'_> {
        let normalized_path = normalize_path(path);

        let Ok(matched) = self.matcher.at(&normalized_path) else {
            return Lookup::NotFound;
        };

        let route = &self.routes[*matched.value];
        match route.handlers.get(&method.to_ascii_uppercase()) {
            Some(handler) => Lookup::Found {
                handler,
                params: matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            None => Lookup::MethodNotAllowed,
        }
    }

    /// Get all routes (for debugging/listing)
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of registered method and pattern pairs.
    pub fn len(&self) -> usize {
        self.routes.iter().map(|r| r.handlers.len()).sum()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .finish()
    }
}

fn normalize_method(method: &str) -> RoutingResult<String> {
    let valid = !method.is_empty()
        && method
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(method.to_ascii_uppercase())
    } else {
        Err(RoutingError::InvalidMethod(method.to_string()))
    }
}

/// Strips trailing slashes, keeping the root path.
fn normalize_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
