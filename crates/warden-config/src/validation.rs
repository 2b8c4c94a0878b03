// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known log levels, recognized feature names, and non-blank provider ids.

use std::str::FromStr;

use warden_profile::{parse_feature, ProfileName};

use crate::diagnostic::ConfigError;
use crate::model::WardenConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WardenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.name is not empty
    if config.server.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.name must not be empty".to_string(),
        });
    }

    // Validate server.log_level is a known level
    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not valid; use one of: {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate profile.name is a known preset
    if ProfileName::from_str(&config.profile.name).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "profile.name `{}` is not valid; use `default` or `preview`",
                config.profile.name
            ),
        });
    }

    // Validate feature overrides name known features with valid values
    for (feature, value) in &config.profile.features {
        if let Err(e) = parse_feature(feature) {
            errors.push(ConfigError::Validation {
                message: format!("profile.features: {e}"),
            });
        }
        if value != "enabled" && value != "disabled" {
            errors.push(ConfigError::Validation {
                message: format!(
                    "profile.features.{feature} must be `enabled` or `disabled`, got `{value}`"
                ),
            });
        }
    }

    // Validate provider directories are non-blank
    for (i, dir) in config.providers.directories.iter().enumerate() {
        if dir.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("providers.directories[{i}] must not be empty"),
            });
        }
    }

    // Validate SPI names and provider ids are non-blank
    for (spi_name, spi_config) in &config.spi {
        if spi_name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "spi section names must not be empty".to_string(),
            });
        }
        if let Some(provider) = &spi_config.provider
            && provider.trim().is_empty()
        {
            errors.push(ConfigError::Validation {
                message: format!("spi.{spi_name}.provider must not be empty"),
            });
        }
        for provider_id in spi_config.providers.keys() {
            if provider_id.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("spi.{spi_name} provider ids must not be empty"),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
