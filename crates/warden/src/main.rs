// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Warden server binary.
//!
//! Hosts the provider framework: loads configuration, resolves the
//! feature profile from config and `-D` properties, deploys provider
//! packages, and exposes inspection subcommands over the result.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod bootstrap;
mod check;
mod features;
mod providers;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use warden_config::{ConfigError, WardenConfig};

/// Warden - an identity server built around a provider framework.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
struct Cli {
    /// Configuration file; defaults to the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// System property, repeatable: -Dwarden.profile=preview.
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE")]
    define: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every SPI with its providers.
    Providers {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// List every feature under the resolved profile.
    Features {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Run startup diagnostics.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            warden_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);

    let result = match cli.command {
        Commands::Providers { plain } => {
            providers::run_providers(&config, &cli.define, plain).await
        }
        Commands::Features { plain } => features::run_features(&config, &cli.define, plain),
        Commands::Check { plain } => {
            check::run_check(&config, cli.config.as_deref(), &cli.define, plain).await
        }
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

/// Loads configuration from `--config` or the XDG hierarchy.
fn load_config(path: Option<&Path>) -> Result<WardenConfig, Vec<ConfigError>> {
    match path {
        Some(path) => warden_config::load_and_validate_path(path),
        None => warden_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warden={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
