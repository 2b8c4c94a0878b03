// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System-property parsing and final profile resolution.
//!
//! Optional capabilities are switched on the command line with the
//! property pattern `-Dwarden.profile.feature.<feature>=enabled`, and the
//! whole preset with `-Dwarden.profile=preview`. Properties outside the
//! `warden.profile` namespace belong to other subsystems and pass through
//! untouched.

use std::collections::BTreeMap;
use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::error::ProfileError;
use crate::feature::Feature;
use crate::profile::{Profile, ProfileName};

/// Property selecting the profile preset.
pub const PROFILE_PROPERTY: &str = "warden.profile";

/// Prefix for per-feature override properties.
pub const FEATURE_PROPERTY_PREFIX: &str = "warden.profile.feature.";

/// Minimum jaro-winkler similarity for a feature-name suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Parsed `-D` system properties relevant to profile resolution.
#[derive(Debug, Clone, Default)]
pub struct SystemProperties {
    profile: Option<String>,
    features: BTreeMap<String, String>,
}

impl SystemProperties {
    /// Parses raw `-D` arguments of the form `key=value`.
    ///
    /// Keys under `warden.profile` must match the documented grammar;
    /// anything else is ignored here.
    pub fn parse(args: &[String]) -> Result<Self, ProfileError> {
        let mut props = Self::default();
        for arg in args {
            let Some((key, value)) = arg.split_once('=') else {
                if arg.trim().starts_with(PROFILE_PROPERTY) {
                    return Err(ProfileError::InvalidProperty {
                        property: arg.clone(),
                    });
                }
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key == PROFILE_PROPERTY {
                props.profile = Some(value.to_string());
            } else if let Some(feature) = key.strip_prefix(FEATURE_PROPERTY_PREFIX) {
                if feature.is_empty() {
                    return Err(ProfileError::InvalidProperty {
                        property: key.to_string(),
                    });
                }
                props.features.insert(feature.to_string(), value.to_string());
            } else if key.starts_with(PROFILE_PROPERTY) {
                // warden.profile.<something> that is not the feature grammar.
                return Err(ProfileError::InvalidProperty {
                    property: key.to_string(),
                });
            }
        }
        Ok(props)
    }

    /// Profile name from `warden.profile`, if given.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Raw per-feature overrides, keyed by feature name.
    pub fn features(&self) -> &BTreeMap<String, String> {
        &self.features
    }
}

/// Resolves the effective profile from configuration and properties.
///
/// Precedence, lowest to highest: compiled default, configuration file,
/// system properties.
pub fn resolve_profile(
    config_name: Option<&str>,
    config_features: &BTreeMap<String, String>,
    props: &SystemProperties,
) -> Result<Profile, ProfileError> {
    let raw_name = props.profile().or(config_name).unwrap_or("default");
    let name = ProfileName::from_str(raw_name).map_err(|_| ProfileError::UnknownProfile {
        name: raw_name.to_string(),
    })?;

    let mut profile = Profile::new(name);
    // Configuration first so that properties override it key by key.
    for (feature_name, value) in config_features.iter().chain(props.features().iter()) {
        let feature = parse_feature(feature_name)?;
        profile.set(feature, parse_feature_value(feature_name, value)?);
    }
    Ok(profile)
}

/// Parses a feature name, attaching a typo suggestion on failure.
pub fn parse_feature(name: &str) -> Result<Feature, ProfileError> {
    Feature::from_str(name).map_err(|_| ProfileError::UnknownFeature {
        name: name.to_string(),
        suggestion: suggest_feature(name),
    })
}

fn parse_feature_value(feature_name: &str, value: &str) -> Result<bool, ProfileError> {
    match value {
        "enabled" => Ok(true),
        "disabled" => Ok(false),
        other => Err(ProfileError::InvalidValue {
            property: feature_name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Closest known feature name, if it clears the similarity threshold.
fn suggest_feature(input: &str) -> Option<String> {
    Feature::iter()
        .map(|f| f.to_string())
        .map(|candidate| {
            let score = strsim::jaro_winkler(input, &candidate);
            (candidate, score)
        })
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_profile_and_feature_properties() {
        let props = SystemProperties::parse(&args(&[
            "warden.profile=preview",
            "warden.profile.feature.scripts=enabled",
            "warden.profile.feature.token-exchange=disabled",
        ]))
        .unwrap();
        assert_eq!(props.profile(), Some("preview"));
        assert_eq!(props.features().get("scripts").map(String::as_str), Some("enabled"));
        assert_eq!(
            props.features().get("token-exchange").map(String::as_str),
            Some("disabled")
        );
    }

    #[test]
    fn foreign_properties_pass_through() {
        let props = SystemProperties::parse(&args(&[
            "java.net.preferIPv4Stack=true",
            "warden.home=/opt/warden",
            "no-equals-sign",
        ]))
        .unwrap();
        assert_eq!(props.profile(), None);
        assert!(props.features().is_empty());
    }

    #[test]
    fn malformed_profile_properties_are_rejected() {
        assert!(matches!(
            SystemProperties::parse(&args(&["warden.profile.feature=scripts"])),
            Err(ProfileError::InvalidProperty { .. })
        ));
        assert!(matches!(
            SystemProperties::parse(&args(&["warden.profile.feature.=enabled"])),
            Err(ProfileError::InvalidProperty { .. })
        ));
        assert!(matches!(
            SystemProperties::parse(&args(&["warden.profile"])),
            Err(ProfileError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn resolve_defaults_without_any_input() {
        let profile =
            resolve_profile(None, &BTreeMap::new(), &SystemProperties::default()).unwrap();
        assert_eq!(profile.name(), ProfileName::Default);
        assert!(!profile.is_enabled(Feature::Scripts));
    }

    #[test]
    fn properties_override_configuration() {
        let mut config_features = BTreeMap::new();
        config_features.insert("scripts".to_string(), "enabled".to_string());
        let props = SystemProperties::parse(&args(&[
            "warden.profile.feature.scripts=disabled",
        ]))
        .unwrap();
        let profile = resolve_profile(Some("preview"), &config_features, &props).unwrap();
        // Config enabled it, the property wins and disables it again.
        assert!(!profile.is_enabled(Feature::Scripts));
        // The preview name came from config and still applies.
        assert!(profile.is_enabled(Feature::TokenExchange));
    }

    #[test]
    fn property_profile_name_wins_over_config() {
        let profile = resolve_profile(
            Some("default"),
            &BTreeMap::new(),
            &SystemProperties::parse(&args(&["warden.profile=preview"])).unwrap(),
        )
        .unwrap();
        assert_eq!(profile.name(), ProfileName::Preview);
    }

    #[test]
    fn unknown_profile_name_errors() {
        let err = resolve_profile(Some("producton"), &BTreeMap::new(), &SystemProperties::default())
            .unwrap_err();
        assert!(matches!(err, ProfileError::UnknownProfile { .. }));
    }

    #[test]
    fn unknown_feature_gets_a_suggestion() {
        let mut config_features = BTreeMap::new();
        config_features.insert("scirpts".to_string(), "enabled".to_string());
        let err = resolve_profile(None, &config_features, &SystemProperties::default())
            .unwrap_err();
        match err {
            ProfileError::UnknownFeature { name, suggestion } => {
                assert_eq!(name, "scirpts");
                assert_eq!(suggestion.as_deref(), Some("scripts"));
            }
            other => panic!("expected UnknownFeature, got {other:?}"),
        }
    }

    #[test]
    fn invalid_feature_value_errors() {
        let mut config_features = BTreeMap::new();
        config_features.insert("scripts".to_string(), "on".to_string());
        let err = resolve_profile(None, &config_features, &SystemProperties::default())
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidValue { .. }));
        assert!(err.to_string().contains("expected 'enabled' or 'disabled'"));
    }
}
