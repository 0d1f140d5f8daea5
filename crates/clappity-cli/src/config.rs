// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Clappity project configuration.
//!
//! Configuration is loaded from `clappity.toml` at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "my-site"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! templates_dir = "templates"
//! static_dir = "static"
//!
//! [render]
//! max_depth = 64
//! max_iterations = 10000
//! brace_mode = "balanced"
//!
//! [[routes]]
//! method = "GET"
//! path = "/"
//! template = "index.clp"
//!
//! [routes.data]
//! title = "Home Page"
//! itemList = ["Item 1", "Item 2"]
//! ```

use std::fs;
use std::path::Path;

use clappity::{BraceMode, DataContext, RenderOptions};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "clappity.toml";

/// Main configuration structure loaded from `clappity.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Renderer limits.
    #[serde(default)]
    pub render: RenderConfig,
    /// Pages served from templates.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Project metadata configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project name (default: "unnamed").
    #[serde(default = "default_project_name")]
    pub name: String,
    /// Project version (default: "0.1.0").
    #[serde(default = "default_version")]
    pub version: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Templates directory (default: "templates").
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    /// Static files directory, served under `/static` (default: "static").
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Renderer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Maximum directive nesting depth (default: 64).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum loop iterations per render (default: 10000).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Brace handling: "balanced" or "compat" (default: "balanced").
    #[serde(default)]
    pub brace_mode: BraceMode,
}

/// A page rendered from a template with fixed data.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// HTTP method (default: "GET").
    #[serde(default = "default_method")]
    pub method: String,
    /// Path pattern, e.g. `/users/{id}`.
    pub path: String,
    /// Template name relative to the templates directory.
    pub template: String,
    /// Data context for the page.
    #[serde(default = "default_data")]
    pub data: JsonValue,
}

fn default_project_name() -> String {
    "unnamed".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_depth() -> usize {
    clappity::renderer::DEFAULT_MAX_DEPTH
}

fn default_max_iterations() -> usize {
    clappity::renderer::DEFAULT_MAX_ITERATIONS
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_data() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            version: default_version(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            templates_dir: default_templates_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_iterations: default_max_iterations(),
            brace_mode: BraceMode::default(),
        }
    }
}

impl RenderConfig {
    /// Converts to renderer options.
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            max_depth: self.max_depth,
            max_iterations: self.max_iterations,
            brace_mode: self.brace_mode,
        }
    }
}

impl RouteConfig {
    /// Converts the inline data table into a data context.
    pub fn data_context(&self) -> clappity::Result<DataContext> {
        DataContext::try_from(self.data.clone())
    }
}

impl Config {
    /// Loads configuration from `clappity.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from an explicit path, with the same fallback
    /// as [`Config::load`].
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            tracing::debug!("No {} found, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)?;
        Self::parse(&content)
    }

    /// Parses configuration text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.project.name, "unnamed");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.templates_dir, "templates");
        assert_eq!(config.render.max_depth, 64);
        assert_eq!(config.render.brace_mode, BraceMode::Balanced);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
[project]
name = "site"

[server]
port = 8080
static_dir = "assets"

[render]
max_iterations = 50
brace_mode = "compat"

[[routes]]
path = "/"
template = "index.clp"

[routes.data]
title = "Home Page"
isUserLoggedIn = true
itemList = ["Item 1", "Item 2"]

[[routes]]
method = "POST"
path = "/users/{id}"
template = "user.clp"
"#,
        )
        .unwrap();

        assert_eq!(config.project.name, "site");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.static_dir, "assets");

        let options = config.render.to_options();
        assert_eq!(options.max_iterations, 50);
        assert_eq!(options.max_depth, 64);
        assert_eq!(options.brace_mode, BraceMode::Compat);

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].method, "GET");
        let ctx = config.routes[0].data_context().unwrap();
        assert_eq!(ctx.display("title"), "Home Page");
        assert!(ctx.is_truthy("isUserLoggedIn"));
        assert_eq!(ctx.sequence("itemList").map(<[String]>::len), Some(2));

        assert_eq!(config.routes[1].method, "POST");
        assert!(config.routes[1].data_context().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_brace_mode_is_rejected() {
        assert!(Config::parse("[render]\nbrace_mode = \"loose\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.server.static_dir, "static");
    }
}
