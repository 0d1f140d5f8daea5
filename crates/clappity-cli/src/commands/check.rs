// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Check command: validates template syntax without rendering.

use std::path::{Path, PathBuf};

use clappity::{RenderOptions, Renderer};
use console::style;

use super::{read_template, render_options};

/// Checks every template, stopping at the first error.
pub fn run(templates: &[PathBuf]) -> anyhow::Result<()> {
    let options = render_options()?;

    for template in templates {
        match check_template(template, options) {
            Ok(count) => println!(
                "{} {} ({} directives)",
                style("ok").green().bold(),
                template.display(),
                count
            ),
            Err(e) => {
                println!("{} {}", style("error").red().bold(), template.display());
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Validates one template file and returns its directive count.
pub fn check_template(template: &Path, options: RenderOptions) -> anyhow::Result<usize> {
    let source = read_template(template)?;
    let count = Renderer::with_options(options).check(&source)?;
    tracing::debug!("{}: {} directives", template.display(), count);
    Ok(count)
}
