// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `warden features` command implementation.
//!
//! Lists every feature with its maturity kind and its state under the
//! profile resolved from configuration and `-D` properties.

use std::io::IsTerminal;

use strum::IntoEnumIterator;
use warden_config::WardenConfig;
use warden_core::WardenError;
use warden_profile::Feature;

use crate::bootstrap;

/// Run the `warden features` command.
///
/// With `--plain`, disables colored output.
pub fn run_features(
    config: &WardenConfig,
    defines: &[String],
    plain: bool,
) -> Result<(), WardenError> {
    let profile = bootstrap::resolve(config, defines)?;
    let use_color = !plain && std::io::stdout().is_terminal();

    println!();
    println!("  warden features ({} profile)", profile.name());
    println!("  {}", "-".repeat(70));

    let mut enabled_count = 0;
    for feature in Feature::iter() {
        let enabled = profile.is_enabled(feature);
        if enabled {
            enabled_count += 1;
        }
        let row = feature_row(feature);
        if use_color {
            use colored::Colorize;
            if enabled {
                println!("    {} {row}", "✓".green());
            } else {
                println!("    {} {}", "✗".dimmed(), row.dimmed());
            }
        } else if enabled {
            println!("    [ON]  {row}");
        } else {
            println!("    [OFF] {row}");
        }
    }

    println!();
    println!(
        "  {enabled_count} of {} features enabled.",
        Feature::iter().count()
    );
    println!();
    Ok(())
}

/// One feature row: name, kind, description, in fixed columns.
fn feature_row(feature: Feature) -> String {
    format!(
        "{:<26} {:<20} {}",
        feature.to_string(),
        feature.kind().to_string(),
        feature.description()
    )
}
