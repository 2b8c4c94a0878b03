// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Warden provider framework.
//!
//! All fixed sections use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized config keys at startup with actionable error messages.
//! The `[spi.*]` tree is the one intentionally open surface: provider
//! tables accept arbitrary keys, which become the factory's init scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scope::TomlScope;

/// Top-level Warden configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WardenConfig {
    /// Server identity and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Feature profile selection.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Provider package deployment settings.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Per-SPI provider configuration, keyed by SPI name.
    #[serde(default)]
    pub spi: BTreeMap<String, SpiConfig>,
}

/// Server identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Display name of this server instance.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_server_name() -> String {
    "warden".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Feature profile configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Profile preset name (`default` or `preview`).
    #[serde(default = "default_profile_name")]
    pub name: String,

    /// Per-feature overrides: feature name to `enabled` or `disabled`.
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            features: BTreeMap::new(),
        }
    }
}

fn default_profile_name() -> String {
    "default".to_string()
}

/// Provider package deployment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Directories scanned for provider packages, in scan order.
    #[serde(default = "default_provider_directories")]
    pub directories: Vec<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            directories: default_provider_directories(),
        }
    }
}

fn default_provider_directories() -> Vec<String> {
    vec!["providers".to_string()]
}

/// Configuration of one SPI.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpiConfig {
    /// Default-provider override for this SPI.
    #[serde(default)]
    pub provider: Option<String>,

    /// Per-provider settings, keyed by provider id.
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// Configuration of one provider under an SPI.
///
/// `enabled` is the single reserved key; every other key is passed to the
/// factory verbatim as its init scope. No `deny_unknown_fields` here:
/// the flattened map is where unknown keys are supposed to go.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Whether the factory participates at all. Absent means enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Arbitrary provider properties, handed to the factory at init.
    #[serde(flatten)]
    pub properties: toml::Table,
}

impl WardenConfig {
    /// Default-provider override for `spi`, if configured.
    pub fn default_provider(&self, spi: &str) -> Option<&str> {
        self.spi.get(spi).and_then(|s| s.provider.as_deref())
    }

    /// Whether the provider participates. Unconfigured providers do.
    pub fn provider_enabled(&self, spi: &str, provider: &str) -> bool {
        self.spi
            .get(spi)
            .and_then(|s| s.providers.get(provider))
            .and_then(|p| p.enabled)
            .unwrap_or(true)
    }

    /// Init scope for the provider; empty when unconfigured.
    pub fn provider_scope(&self, spi: &str, provider: &str) -> TomlScope {
        self.spi
            .get(spi)
            .and_then(|s| s.providers.get(provider))
            .map(|p| TomlScope::new(p.properties.clone()))
            .unwrap_or_default()
    }
}
