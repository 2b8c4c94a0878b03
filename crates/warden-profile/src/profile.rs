// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved profiles: which features are live in this process.

use std::collections::BTreeSet;

use strum::{Display, EnumString, IntoEnumIterator};
use tracing::warn;

use crate::feature::{Feature, FeatureKind};

/// Named feature preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ProfileName {
    /// Default and deprecated features only.
    #[default]
    Default,
    /// Default, deprecated, and preview features.
    Preview,
}

/// The resolved feature set for this process.
///
/// Built once at startup from the profile name plus explicit per-feature
/// overrides, then read everywhere through [`Profile::is_enabled`].
#[derive(Debug, Clone)]
pub struct Profile {
    name: ProfileName,
    enabled: BTreeSet<Feature>,
}

impl Profile {
    /// Creates the kind-based feature set for `name`.
    ///
    /// Experimental and disabled-by-default features are never enabled
    /// implicitly; deprecated features are enabled but warn.
    pub fn new(name: ProfileName) -> Self {
        let mut enabled = BTreeSet::new();
        for feature in Feature::iter() {
            let on = match feature.kind() {
                FeatureKind::Default | FeatureKind::Deprecated => true,
                FeatureKind::Preview => name == ProfileName::Preview,
                FeatureKind::Experimental | FeatureKind::DisabledByDefault => false,
            };
            if on {
                if feature.kind() == FeatureKind::Deprecated {
                    warn!(feature = %feature, "deprecated feature is enabled");
                }
                enabled.insert(feature);
            }
        }
        Self { name, enabled }
    }

    /// Explicitly enables or disables one feature.
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        if enabled {
            if feature.kind() == FeatureKind::Deprecated && !self.enabled.contains(&feature) {
                warn!(feature = %feature, "deprecated feature is enabled");
            }
            self.enabled.insert(feature);
        } else {
            self.enabled.remove(&feature);
        }
    }

    /// Whether `feature` is live under this profile.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }

    /// The preset this profile was derived from.
    pub fn name(&self) -> ProfileName {
        self.name
    }

    /// Enabled features, sorted by name.
    pub fn enabled_features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self.enabled.iter().copied().collect();
        features.sort_by_key(|f| f.to_string());
        features
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(ProfileName::Default)
    }
}
