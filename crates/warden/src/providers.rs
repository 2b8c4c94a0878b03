// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `warden providers` command implementation.
//!
//! Deploys the configured packages, then prints every SPI with its
//! providers in resolution order: default first by construction, since
//! providers sort by descending order and ascending id.

use std::io::IsTerminal;

use warden_config::WardenConfig;
use warden_core::WardenError;
use warden_spi::{ProviderDescriptor, SpiDescriptor};

use crate::bootstrap;

/// Run the `warden providers` command.
///
/// With `--plain`, disables colored output.
pub async fn run_providers(
    config: &WardenConfig,
    defines: &[String],
    plain: bool,
) -> Result<(), WardenError> {
    let profile = bootstrap::resolve(config, defines)?;
    let sessions = bootstrap::build_sessions(config, profile)?;
    let spis = sessions.registry().describe();
    let use_color = !plain && std::io::stdout().is_terminal();

    println!();
    println!("  warden providers");
    println!("  {}", "-".repeat(60));

    for spi in &spis {
        print_spi(spi, use_color);
    }

    println!();
    let spi_word = if spis.len() == 1 { "SPI" } else { "SPIs" };
    println!("  {} {spi_word}.", spis.len());
    println!();

    sessions.shutdown().await;
    Ok(())
}

fn print_spi(spi: &SpiDescriptor, use_color: bool) {
    if use_color {
        use colored::Colorize;
        println!(
            "    {}{}  {}",
            spi.name.bold(),
            internal_tag(spi),
            spi.interface.dimmed()
        );
    } else {
        println!("    {}{}  {}", spi.name, internal_tag(spi), spi.interface);
    }

    if spi.providers.is_empty() {
        println!("        (no providers)");
    }
    for provider in &spi.providers {
        let line = provider_line(provider);
        if use_color && provider.default {
            use colored::Colorize;
            println!("      {}", line.green());
        } else {
            println!("      {line}");
        }
        for (key, value) in &provider.operational_info {
            println!("          {key}: {value}");
        }
    }
}

/// Annotation appended to the names of internal SPIs.
fn internal_tag(spi: &SpiDescriptor) -> &'static str {
    if spi.internal {
        " (internal)"
    } else {
        ""
    }
}

/// One provider row: default marker, id, order.
fn provider_line(provider: &ProviderDescriptor) -> String {
    let marker = if provider.default { "*" } else { " " };
    format!("{marker} {}  [order {}]", provider.id, provider.order)
}
