// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! This module contains the implementations for all clappity CLI commands:
//!
//! - `check`: Validate template syntax
//! - `init`: Initialize a new clappity project
//! - `render`: Render a template to stdout
//! - `serve`: Serve configured routes over HTTP

/// Template syntax check command.
pub mod check;
/// Project initialization command.
pub mod init;
/// Single template render command.
pub mod render;
/// HTTP server command.
pub mod serve;

use std::path::Path;

use anyhow::Context;
use clappity::RenderOptions;

use crate::config::Config;

/// Renderer options from `clappity.toml` in the current directory.
fn render_options() -> anyhow::Result<RenderOptions> {
    Ok(Config::load()?.render.to_options())
}

fn read_template(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Could not read template {}", path.display()))
}
