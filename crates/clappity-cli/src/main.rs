// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clappity_cli::commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clappity")]
#[command(author = "Clappity Contributors")]
#[command(version)]
#[command(about = "Bracket-directive templates and a tiny HTML server", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new clappity project
    Init {
        /// Project directory (defaults to the current directory)
        name: Option<String>,
    },
    /// Render a template to stdout
    Render {
        /// Template file
        template: PathBuf,
        /// JSON file with the data context
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Check template syntax without rendering output
    Check {
        /// Template files
        #[arg(required = true)]
        templates: Vec<PathBuf>,
    },
    /// Serve the routes configured in clappity.toml
    Serve {
        /// Port to run the server on (defaults to [server].port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (defaults to [server].host)
        #[arg(long)]
        host: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { name } => commands::init::run(name),
        Commands::Render { template, data } => {
            commands::render::run(&template, data.as_deref())
        }
        Commands::Check { templates } => commands::check::run(&templates),
        Commands::Serve { port, host } => {
            commands::serve::run(host.as_deref(), port).await
        }
    }
}
