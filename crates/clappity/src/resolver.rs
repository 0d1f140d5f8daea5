// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template resource resolution.
//!
//! This module provides the [`ResourceResolver`] trait and the filesystem
//! implementation used by the server. See
//! [`MemoryResourceResolver`](crate::MemoryResourceResolver) for an
//! in-memory variant.
//!
//! # Resolution Algorithm
//!
//! 1. A leading `/` is stripped, so `/index.clp` and `index.clp` are the same.
//! 2. Names containing `..` or a drive prefix are rejected.
//! 3. The name is joined onto the root directory; if no such file exists
//!    and the name has no extension, `.clp` is tried.

use std::path::{Component, Path, PathBuf};

use crate::error::{ClappityError, Result};

/// Extension tried when a template name has none.
pub const TEMPLATE_EXTENSION: &str = "clp";

/// Converts a Path to a string with forward slashes.
#[inline]
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        path.as_ref().to_string_lossy().replace('\\', "/")
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// A resolved template with its path and source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// The path the template was loaded from.
    pub path: String,
    /// The template source.
    pub source: String,
}

/// Trait for locating and loading templates by name.
///
/// Implementations must be thread-safe so one engine can serve
/// concurrent requests.
pub trait ResourceResolver: Send + Sync + 'static {
    /// Resolves a template name and returns its source.
    fn resolve(&self, name: &str) -> Result<ResolvedResource>;

    /// Creates a boxed clone.
    fn clone_box(&self) -> Box<dyn ResourceResolver>;
}

impl Clone for Box<dyn ResourceResolver> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl ResourceResolver for Box<dyn ResourceResolver> {
    fn resolve(&self, name: &str) -> Result<ResolvedResource> {
        (**self).resolve(name)
    }

    fn clone_box(&self) -> Box<dyn ResourceResolver> {
        (**self).clone_box()
    }
}

/// Filesystem-based resolver rooted at a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use clappity::{FileSystemResolver, ResourceResolver};
///
/// let resolver = FileSystemResolver::new("./templates");
/// let resource = resolver.resolve("index.clp")?;
/// # Ok::<(), clappity::ClappityError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    /// The root directory for template resolution.
    pub root_dir: PathBuf,
}

impl FileSystemResolver {
    /// Creates a resolver rooted at `root_dir`.
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_path_buf(),
        }
    }

    fn candidate_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name.trim_start_matches('/'));

        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::Prefix(_) | Component::RootDir
            )
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(ClappityError::Resolution(format!(
                "Invalid template name '{}'",
                name
            )));
        }

        let full_path = self.root_dir.join(relative);
        if full_path.is_file() || full_path.extension().is_some() {
            return Ok(full_path);
        }
        Ok(full_path.with_extension(TEMPLATE_EXTENSION))
    }
}

impl ResourceResolver for FileSystemResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedResource> {
        let path = self.candidate_path(name)?;
        tracing::debug!("Resolved path for '{}': {}", name, path.display());

        if !path.is_file() {
            return Err(ClappityError::Resolution(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let source = std::fs::read_to_string(&path).map_err(|e| {
            ClappityError::Resolution(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Ok(ResolvedResource {
            path: path_to_string(&path),
            source,
        })
    }

    fn clone_box(&self) -> Box<dyn ResourceResolver> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_with_and_without_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.clp"), "<h1>[[title]]</h1>").unwrap();

        let resolver = FileSystemResolver::new(dir.path());
        assert_eq!(resolver.resolve("index.clp").unwrap().source, "<h1>[[title]]</h1>");
        assert_eq!(resolver.resolve("index").unwrap().source, "<h1>[[title]]</h1>");
        assert_eq!(resolver.resolve("/index.clp").unwrap().source, "<h1>[[title]]</h1>");
    }

    #[test]
    fn test_nested_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/about.clp"), "about").unwrap();

        let resolver = FileSystemResolver::new(dir.path());
        let resolved = resolver.resolve("pages/about").unwrap();
        assert!(resolved.path.ends_with("pages/about.clp"));
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = TempDir::new().unwrap();
        let resolver = FileSystemResolver::new(dir.path());
        assert!(matches!(
            resolver.resolve("../secret.clp"),
            Err(ClappityError::Resolution(_))
        ));
        assert!(matches!(
            resolver.resolve("a/../../b.clp"),
            Err(ClappityError::Resolution(_))
        ));
        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let resolver = FileSystemResolver::new(dir.path());
        let err = resolver.resolve("nope.clp").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
