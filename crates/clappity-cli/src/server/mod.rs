// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Server components.
//!
//! An [`App`] owns a route table, a middleware chain and the template
//! engine. It dispatches platform-agnostic requests; the `http` module
//! adapts it to axum.
//!
//! # Components
//!
//! - `app`: dispatch and config-driven pages
//! - `http`: HTTP server using Axum

/// Dispatch and route registration.
pub mod app;
/// HTTP server implementation using Axum.
pub mod http;

use clappity::{
    ClappityResponse, DataContext, Engine, RenderOptions, ResourceResolver,
};

pub use app::App;
pub use http::{build_router, MAX_BODY_SIZE};

/// Engine type shared by all handlers.
pub type SharedEngine = Engine<Box<dyn ResourceResolver>>;

/// What route handlers can reach besides the request.
#[derive(Clone)]
pub struct AppContext {
    engine: SharedEngine,
}

impl AppContext {
    /// Creates a context rendering templates from `resolver`.
    pub fn new<R: ResourceResolver>(resolver: R) -> Self {
        Self::with_options(resolver, RenderOptions::default())
    }

    /// Creates a context with explicit renderer limits.
    pub fn with_options<R: ResourceResolver>(resolver: R, options: RenderOptions) -> Self {
        let resolver: Box<dyn ResourceResolver> = Box::new(resolver);
        Self {
            engine: Engine::with_options(resolver, options),
        }
    }

    /// The template engine.
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Renders a template into an HTML response.
    ///
    /// Failures become a 500 error page carrying the escaped message.
    pub fn render(&self, template: &str, ctx: &DataContext) -> ClappityResponse {
        match self.engine.render_file(template, ctx) {
            Ok(html) => ClappityResponse::html(200, html),
            Err(e) => {
                tracing::error!("Failed to render {}: {}", template, e);
                ClappityResponse::error_page(500, &e.to_string())
            }
        }
    }

    /// Renders a template, answering 200 with a placeholder body when it
    /// cannot be loaded.
    pub fn serve_file(&self, template: &str, ctx: &DataContext) -> ClappityResponse {
        ClappityResponse::html(200, self.engine.serve_file(template, ctx))
    }
}
