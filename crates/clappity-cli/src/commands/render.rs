// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Render command: prints one rendered template.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clappity::{DataContext, RenderOptions, Renderer};

use super::{read_template, render_options};

/// Renders `template` with the JSON object in `data` and writes the
/// result to stdout.
pub fn run(template: &Path, data: Option<&Path>) -> anyhow::Result<()> {
    let ctx = match data {
        Some(path) => load_data(path)?,
        None => DataContext::new(),
    };

    let output = render_template(template, &ctx, render_options()?)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Reads a data context from a JSON file.
pub fn load_data(path: &Path) -> anyhow::Result<DataContext> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read data file {}", path.display()))?;
    DataContext::from_json_str(&json)
        .with_context(|| format!("Invalid data file {}", path.display()))
}

/// Reads and renders a template file.
pub fn render_template(
    template: &Path,
    ctx: &DataContext,
    options: RenderOptions,
) -> anyhow::Result<String> {
    let source = read_template(template)?;
    let output = Renderer::with_options(options)
        .render(&source, ctx)
        .with_context(|| format!("Failed to render {}", template.display()))?;
    Ok(output)
}
