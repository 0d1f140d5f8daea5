// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! Clappity CLI library.
//!
//! This crate provides the command-line interface and the small HTTP
//! server built on the `clappity` template renderer.
//!
//! # Features
//!
//! - **Route table** keyed by method and path, with `{param}` captures
//! - **Middleware** that runs before dispatch and may answer early
//! - **Config-driven pages** declared as `[[routes]]` in `clappity.toml`
//! - **Static files** served under `/static`
//!
//! # Usage
//!
//! This crate is primarily used through the `clappity` binary:
//!
//! ```bash
//! clappity init my-site          # Scaffold a demo project
//! clappity render index.clp      # Print a rendered template
//! clappity check templates/*.clp # Validate template syntax
//! clappity serve                 # Serve configured routes
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `clappity.toml` at the project root.

/// CLI commands (init, render, check, serve).
pub mod commands;
/// Project configuration from `clappity.toml`.
pub mod config;
/// Middleware run before route dispatch.
pub mod middleware;
/// Method and path route table.
pub mod router;
/// Application and HTTP adapter.
pub mod server;
