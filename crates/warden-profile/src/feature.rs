// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The feature table: every optional capability the server ships.

use strum::{Display, EnumIter, EnumString};

/// Optional server capability gated by the active profile.
///
/// Feature names are kebab-case on every external surface: configuration
/// files, system properties, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Feature {
    /// Account management REST API.
    AccountApi,
    /// Administrators acting as another user.
    Impersonation,
    /// Client registration and update policies.
    ClientPolicies,
    /// Client-initiated backchannel authentication.
    Ciba,
    /// Fine-grained permissions on admin operations.
    AdminFineGrainedAuthz,
    /// Backup recovery codes as a second factor.
    RecoveryCodes,
    /// Script providers deployed through provider packages.
    Scripts,
    /// OAuth 2.0 token exchange.
    TokenExchange,
    /// Dynamically scoped client authorizations.
    DynamicScopes,
    /// Docker registry protocol support.
    Docker,
    /// Uploading scripts through the admin interface.
    UploadScripts,
}

/// Maturity class of a feature; decides its default state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum FeatureKind {
    /// Enabled in every profile.
    Default,
    /// Enabled only in the preview profile or by explicit override.
    Preview,
    /// Never enabled implicitly.
    Experimental,
    /// Still enabled by default, warns on use, scheduled for removal.
    Deprecated,
    /// Shipped disabled; must be switched on explicitly.
    DisabledByDefault,
}

impl Feature {
    /// Maturity class of this feature.
    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::AccountApi
            | Feature::Impersonation
            | Feature::ClientPolicies
            | Feature::Ciba => FeatureKind::Default,
            Feature::AdminFineGrainedAuthz
            | Feature::RecoveryCodes
            | Feature::Scripts
            | Feature::TokenExchange => FeatureKind::Preview,
            Feature::DynamicScopes => FeatureKind::Experimental,
            Feature::Docker => FeatureKind::DisabledByDefault,
            Feature::UploadScripts => FeatureKind::Deprecated,
        }
    }

    /// One-line description for CLI listings.
    pub fn description(self) -> &'static str {
        match self {
            Feature::AccountApi => "Account management REST API",
            Feature::Impersonation => "Admin impersonation of users",
            Feature::ClientPolicies => "Client registration policies",
            Feature::Ciba => "Client-initiated backchannel authentication",
            Feature::AdminFineGrainedAuthz => "Fine-grained admin permissions",
            Feature::RecoveryCodes => "Recovery codes second factor",
            Feature::Scripts => "Deployed script providers",
            Feature::TokenExchange => "OAuth 2.0 token exchange",
            Feature::DynamicScopes => "Dynamic client scopes",
            Feature::Docker => "Docker registry protocol",
            Feature::UploadScripts => "Script upload via admin interface",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn feature_names_round_trip() {
        for feature in Feature::iter() {
            let name = feature.to_string();
            let parsed = Feature::from_str(&name).expect("should parse back");
            assert_eq!(feature, parsed);
        }
    }

    #[test]
    fn feature_names_are_kebab_case() {
        assert_eq!(Feature::AccountApi.to_string(), "account-api");
        assert_eq!(
            Feature::AdminFineGrainedAuthz.to_string(),
            "admin-fine-grained-authz"
        );
        assert_eq!(Feature::Scripts.to_string(), "scripts");
    }

    #[test]
    fn kind_table_is_total() {
        // Every feature has a kind and a description; one representative
        // per kind keeps the table honest.
        assert_eq!(Feature::AccountApi.kind(), FeatureKind::Default);
        assert_eq!(Feature::Scripts.kind(), FeatureKind::Preview);
        assert_eq!(Feature::DynamicScopes.kind(), FeatureKind::Experimental);
        assert_eq!(Feature::Docker.kind(), FeatureKind::DisabledByDefault);
        assert_eq!(Feature::UploadScripts.kind(), FeatureKind::Deprecated);
        for feature in Feature::iter() {
            assert!(!feature.description().is_empty());
        }
    }
}
