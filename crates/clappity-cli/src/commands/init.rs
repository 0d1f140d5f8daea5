// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Project initialization command for creating new clappity projects.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use include_dir::{include_dir, Dir, DirEntry};

use crate::config::CONFIG_FILE;

static DEFAULT_TEMPLATE: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates/default");

/// Initializes a new clappity project with a demo home page.
pub fn run(name: Option<String>) -> anyhow::Result<()> {
    // Handle "." or no argument to init in current directory
    let is_current_dir = matches!(name.as_deref(), Some(".") | None);
    let (project_dir, project_name) = resolve_project_path(name)?;

    scaffold(&project_dir, &project_name)?;
    print_success(&project_name, is_current_dir);

    Ok(())
}

/// Writes the demo project into `project_dir`.
///
/// Fails without writing anything if the directory already holds a
/// `clappity.toml`.
pub fn scaffold(project_dir: &Path, project_name: &str) -> anyhow::Result<()> {
    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "{} already exists in {}",
            CONFIG_FILE,
            project_dir.display()
        );
    }

    if project_dir.exists() {
        tracing::info!(
            "Initializing clappity project in existing directory: {}",
            project_name
        );
    } else {
        fs::create_dir_all(project_dir)?;
        tracing::info!("Created project directory: {}", project_name);
    }

    for entry in DEFAULT_TEMPLATE.entries() {
        extract_entry(entry, project_dir, project_name)?;
    }

    Ok(())
}

fn resolve_project_path(name: Option<String>) -> anyhow::Result<(PathBuf, String)> {
    match name.as_deref() {
        Some(".") | None => {
            let current_dir = std::env::current_dir()?;
            let dir_name = current_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "my-clappity-site".to_string());
            Ok((current_dir, dir_name))
        }
        Some(name) => {
            let project_path = Path::new(name).to_path_buf();
            let dir_name = project_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string());
            Ok((project_path, dir_name))
        }
    }
}

fn extract_entry(entry: &DirEntry, target: &Path, project_name: &str) -> anyhow::Result<()> {
    match entry {
        DirEntry::Dir(dir) => {
            fs::create_dir_all(target.join(dir.path()))?;
            for child in dir.entries() {
                extract_entry(child, target, project_name)?;
            }
        }
        DirEntry::File(file) => {
            let file_path = file.path();
            let file_name = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid file name: {:?}", file_path))?;

            let target_name = match file_name {
                "gitignore" => ".gitignore",
                name => name.strip_suffix(".tmpl").unwrap_or(name),
            };

            let target_path = match file_path.parent() {
                Some(parent) => target.join(parent).join(target_name),
                None => target.join(target_name),
            };
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let content = file
                .contents_utf8()
                .ok_or_else(|| anyhow::anyhow!("Non-UTF8 file: {:?}", file_path))?;

            // Substitute project name in .tmpl files
            let content = if file_name.ends_with(".tmpl") {
                content.replace("{{project_name}}", project_name)
            } else {
                content.to_string()
            };

            fs::write(&target_path, content)?;
            tracing::debug!("Wrote {}", target_path.display());
        }
    }
    Ok(())
}

fn print_success(project_name: &str, is_current_dir: bool) {
    println!(
        "{} {}",
        style("Created clappity project:").green().bold(),
        project_name
    );
    println!();
    println!("Next steps:");
    if !is_current_dir {
        println!("  cd {}", project_name);
    }
    println!("  clappity serve");
    println!();
    println!(
        "Then visit {}",
        style("http://127.0.0.1:3000/").cyan().underlined()
    );
}
