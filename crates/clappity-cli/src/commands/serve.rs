// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Serve command.
//!
//! Loads `clappity.toml`, registers its `[[routes]]` and serves them
//! together with the static directory.

use console::style;

use crate::config::Config;
use crate::server::App;

/// Runs the HTTP server. `host` and `port` override `[server]`.
pub async fn run(host: Option<&str>, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let working_dir = std::env::current_dir()?;

    println!("{}", style("Starting clappity server...").cyan().bold());

    let app = App::from_config(&config, &working_dir)?;
    if app.routes().is_empty() {
        println!(
            "{}",
            style("No routes configured in clappity.toml").yellow()
        );
    } else {
        for route in app.routes().routes() {
            println!(
                "  {} {}",
                style(route.methods().join(",")).dim(),
                route.pattern
            );
        }
    }

    let static_dir = working_dir.join(&config.server.static_dir);
    let static_dir = static_dir.is_dir().then_some(static_dir);

    let addr = format!(
        "{}:{}",
        host.unwrap_or(&config.server.host),
        port.unwrap_or(config.server.port)
    );
    println!();
    println!(
        "{} {}",
        style("Server running at").green().bold(),
        style(format!("http://{}", addr)).cyan().underlined()
    );
    println!("{}", style("Press Ctrl+C to stop").dim());

    app.listen(&addr, static_dir.as_deref()).await
}
