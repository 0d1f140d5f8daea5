// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # Clappity
//!
//! Bracket-directive text templating for small HTML servers.
//!
//! Templates are plain text with four directives:
//!
//! | Directive | Syntax |
//! |---|---|
//! | Variable | `[[name]]` |
//! | Section | `[[section name]] { ...body... }` |
//! | Conditional | `[[if name]] { ... }` / `[[if !name]] { ... }` |
//! | Loop | `[[for item in listName]] { ... [[item]] ... }` |
//!
//! Values are not escaped. Missing keys render as empty text, missing
//! lists skip their loop, and malformed directives fail with a
//! positioned [`ClappityError`].
//!
//! ## Quick Start
//!
//! ```rust
//! use clappity::{render, DataContext};
//!
//! let ctx = DataContext::new()
//!     .with("title", "Home Page")
//!     .with("isUserLoggedIn", true)
//!     .with("username", "JohnDoe");
//!
//! let html = render(
//!     "<h1>[[title]]</h1>[[if isUserLoggedIn]] { <p>Hi [[username]]</p> }",
//!     &ctx,
//! )?;
//! assert_eq!(html, "<h1>Home Page</h1><p>Hi JohnDoe</p>");
//! # Ok::<(), clappity::ClappityError>(())
//! ```

/// Data context values and conversion from JSON.
pub mod context;
/// Directive parsing.
pub mod directive;
/// Template loading and rendering.
pub mod engine;
/// Error types and reporting.
pub mod error;
/// In-memory resource resolver.
pub mod memory_resolver;
/// The recursive renderer.
pub mod renderer;
/// HTTP request abstraction.
pub mod request;
/// Template resolution.
pub mod resolver;
/// HTTP response abstraction.
pub mod response;
/// Bounds-checked template cursor.
pub mod scanner;
/// Shared request body parsing helpers.
mod body;

pub use body::BodyParseError;
pub use context::{ContextValue, DataContext};
pub use directive::{BraceMode, Condition, Directive, DirectiveKind};
pub use engine::{load_error_message, Engine};
pub use error::{ClappityError, Result, SourceContext};
pub use memory_resolver::MemoryResourceResolver;
pub use renderer::{render, RenderOptions, Rendered, Renderer, Section};
pub use request::ClappityRequest;
pub use resolver::{FileSystemResolver, ResolvedResource, ResourceResolver};
pub use response::ClappityResponse;
pub use scanner::{Scanner, Span};
