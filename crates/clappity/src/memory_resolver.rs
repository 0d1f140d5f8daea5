// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ClappityError, Result};
use crate::resolver::{ResolvedResource, ResourceResolver, TEMPLATE_EXTENSION};

/// Memory-based resolver that stores templates by name.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryResourceResolver {
    templates: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryResourceResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn add_template(&self, name: &str, source: impl Into<String>) {
        let mut templates = self.templates.write().unwrap_or_else(|e| e.into_inner());
        templates.insert(normalize(name), source.into());
    }

    /// Remove a template.
    pub fn remove_template(&self, name: &str) {
        let mut templates = self.templates.write().unwrap_or_else(|e| e.into_inner());
        templates.remove(&normalize(name));
    }

    /// Remove every template.
    pub fn clear(&self) {
        let mut templates = self.templates.write().unwrap_or_else(|e| e.into_inner());
        templates.clear();
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('/')
        .trim_start_matches("./")
        .replace('\\', "/")
}

impl ResourceResolver for MemoryResourceResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedResource> {
        let templates = self.templates.read().unwrap_or_else(|e| e.into_inner());
        let name = normalize(name);

        let with_ext = format!("{}.{}", name, TEMPLATE_EXTENSION);
        for candidate in [&name, &with_ext] {
            if let Some(source) = templates.get(candidate) {
                return Ok(ResolvedResource {
                    path: candidate.clone(),
                    source: source.clone(),
                });
            }
        }

        Err(ClappityError::Resolution(format!(
            "Template not found: {}",
            name
        )))
    }

    fn clone_box(&self) -> Box<dyn ResourceResolver> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_resolver_direct() {
        let resolver = MemoryResourceResolver::new();
        resolver.add_template("test.clp", "<div>Hello</div>");

        let resolved = resolver.resolve("test.clp").unwrap();
        assert_eq!(resolved.path, "test.clp");
        assert_eq!(resolved.source, "<div>Hello</div>");

        let resolved_no_ext = resolver.resolve("test").unwrap();
        assert_eq!(resolved_no_ext.path, "test.clp");

        assert!(resolver.resolve("nonexistent").is_err());
    }

    #[test]
    fn test_memory_resolver_add_remove_clear() {
        let resolver = MemoryResourceResolver::new();
        resolver.add_template("temp.clp", "test");
        assert!(resolver.resolve("/temp").is_ok());

        resolver.remove_template("temp.clp");
        assert!(resolver.resolve("temp").is_err());

        resolver.add_template("temp1.clp", "test1");
        resolver.add_template("temp2.clp", "test2");
        resolver.clear();
        assert!(resolver.resolve("temp1").is_err());
        assert!(resolver.resolve("temp2").is_err());
    }

    #[test]
    fn test_clones_share_storage() {
        let resolver = MemoryResourceResolver::new();
        let clone = resolver.clone();
        resolver.add_template("shared.clp", "x");
        assert_eq!(clone.resolve("shared").unwrap().source, "x");
    }
}
