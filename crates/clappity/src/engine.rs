// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template engine: file loading plus rendering.
//!
//! [`Engine`] pairs a [`ResourceResolver`] with a [`Renderer`]. It is the
//! collaborator the HTTP layer talks to: it loads a template by name and
//! renders it against a [`DataContext`].
//!
//! # Quick Start
//!
//! ```rust
//! use clappity::{DataContext, Engine, MemoryResourceResolver};
//!
//! let resolver = MemoryResourceResolver::new();
//! resolver.add_template("hello.clp", "Hello, [[name]]!");
//!
//! let engine = Engine::new(resolver);
//! let ctx = DataContext::new().with("name", "World");
//! assert_eq!(engine.render_file("hello.clp", &ctx).unwrap(), "Hello, World!");
//! ```
//!
//! Templates are read on every call; there is no cache.

use crate::context::DataContext;
use crate::error::Result;
use crate::renderer::{RenderOptions, Rendered, Renderer};
use crate::resolver::ResourceResolver;

/// Loads and renders templates.
///
/// The engine is immutable once built and can be shared behind an `Arc`.
#[derive(Clone)]
pub struct Engine<R: ResourceResolver> {
    resolver: R,
    renderer: Renderer,
}

impl<R: ResourceResolver> Engine<R> {
    /// Creates an engine with default render options.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            renderer: Renderer::new(),
        }
    }

    /// Creates an engine with custom render options.
    pub fn with_options(resolver: R, options: RenderOptions) -> Self {
        Self {
            resolver,
            renderer: Renderer::with_options(options),
        }
    }

    /// The resolver used for loading templates.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The renderer used for templates.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Loads a template by name and renders it, keeping section output.
    pub fn render_file_document(&self, name: &str, ctx: &DataContext) -> Result<Rendered> {
        tracing::info!("Loading template file: {}", name);
        let resource = self.resolver.resolve(name)?;
        tracing::debug!("Template loaded: {} ({})", name, resource.path);

        let rendered = self.renderer.render_document(&resource.source, ctx)?;
        tracing::info!("Template rendered successfully: {}", name);
        Ok(rendered)
    }

    /// Loads a template by name and renders it.
    pub fn render_file(&self, name: &str, ctx: &DataContext) -> Result<String> {
        self.render_file_document(name, ctx).map(|r| r.output)
    }

    /// Loads and renders a template, never failing.
    ///
    /// On any error the failure is logged and the placeholder
    /// `Error: Could not load file <name>` is returned instead.
    pub fn serve_file(&self, name: &str, ctx: &DataContext) -> String {
        match self.render_file(name, ctx) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Error loading file {}: {}", name, e);
                load_error_message(name)
            }
        }
    }

    /// Loads a template and validates its syntax without rendering.
    ///
    /// Returns the number of directives found.
    pub fn check_file(&self, name: &str) -> Result<usize> {
        let resource = self.resolver.resolve(name)?;
        self.renderer.check(&resource.source)
    }
}

/// The placeholder body returned when a template cannot be served.
pub fn load_error_message(name: &str) -> String {
    format!("Error: Could not load file {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_resolver::MemoryResourceResolver;
    use crate::ClappityError;

    fn engine() -> Engine<MemoryResourceResolver> {
        let resolver = MemoryResourceResolver::new();
        resolver.add_template("index.clp", "<h1>[[title]]</h1>");
        resolver.add_template("broken.clp", "[[if flag]] { never closed");
        resolver.add_template(
            "layout.clp",
            "[[section header]] { <h1>[[title]]</h1> }<main>[[section body]] { ok }</main>",
        );
        Engine::new(resolver)
    }

    #[test]
    fn test_render_file() {
        let ctx = DataContext::new().with("title", "Home Page");
        assert_eq!(
            engine().render_file("index", &ctx).unwrap(),
            "<h1>Home Page</h1>"
        );
    }

    #[test]
    fn test_serve_file_placeholder() {
        let ctx = DataContext::new();
        assert_eq!(
            engine().serve_file("missing.clp", &ctx),
            "Error: Could not load file missing.clp"
        );
        assert_eq!(
            engine().serve_file("broken.clp", &ctx),
            "Error: Could not load file broken.clp"
        );
    }

    #[test]
    fn test_render_file_document_sections() {
        let ctx = DataContext::new().with("title", "T");
        let rendered = engine().render_file_document("layout", &ctx).unwrap();
        assert_eq!(rendered.output, "<h1>T</h1><main>ok</main>");
        assert_eq!(rendered.section("header"), Some("<h1>T</h1>"));
        assert_eq!(rendered.section("body"), Some("ok"));
    }

    #[test]
    fn test_check_file() {
        assert_eq!(engine().check_file("layout").unwrap(), 3);
        assert!(matches!(
            engine().check_file("broken"),
            Err(ClappityError::UnexpectedEndOfInput { .. })
        ));
    }
}
