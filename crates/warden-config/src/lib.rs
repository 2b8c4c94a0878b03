// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Warden provider framework.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and Elm-style diagnostic
//! error rendering with typo suggestions. The `[spi.*]` tree is the deliberate
//! exception to strictness: provider tables are open key-value scopes handed to
//! factories at init.
//!
//! # Usage
//!
//! ```no_run
//! use warden_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Server name: {}", config.server.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod scope;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ProviderConfig, SpiConfig, WardenConfig};
pub use scope::TomlScope;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to rich miette diagnostics with typo suggestions
///
/// Returns either a valid `WardenConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<WardenConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            // Read TOML source files for error source span information
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<WardenConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from an explicit file path and validate it.
///
/// Used when the server is started with `--config <path>`.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<WardenConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let mut sources = Vec::new();
            if let Ok(content) = std::fs::read_to_string(path) {
                sources.push((path.display().to_string(), content));
            }
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    // Local config
    if let Ok(content) = std::fs::read_to_string("warden.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("warden.toml").display().to_string())
            .unwrap_or_else(|_| "warden.toml".to_string());
        sources.push((path, content));
    }

    // XDG user config
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("warden/warden.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    // System config
    let system_path = std::path::Path::new("/etc/warden/warden.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_str_accepts_full_config() {
        let config = load_and_validate_str(
            r#"
            [server]
            name = "warden-test"
            log_level = "debug"

            [profile]
            name = "preview"

            [providers]
            directories = ["providers", "extra-providers"]

            [spi.event-listener]
            provider = "logging"

            [spi.event-listener.providers.logging]
            success-level = "debug"
            "#,
        )
        .expect("config should load");
        assert_eq!(config.server.name, "warden-test");
        assert_eq!(config.providers.directories.len(), 2);
    }

    #[test]
    fn load_and_validate_str_reports_typos() {
        let errors = load_and_validate_str("[server]\nlog_levl = \"info\"\n").unwrap_err();
        assert!(!errors.is_empty());
        let rendered = errors.iter().map(|e| e.to_string()).collect::<String>();
        assert!(rendered.contains("log_levl"));
    }

    #[test]
    fn load_and_validate_str_reports_semantic_errors() {
        let errors = load_and_validate_str("[server]\nlog_level = \"loud\"\n").unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { .. })));
    }
}
