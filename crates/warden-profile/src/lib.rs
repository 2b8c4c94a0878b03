// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature flags and profile resolution for the Warden provider framework.
//!
//! A profile is the set of optional capabilities live in this process.
//! It is resolved once at startup from a named preset (`default` or
//! `preview`), per-feature overrides in the configuration file, and
//! `-Dwarden.profile.feature.<name>=enabled` system properties.

pub mod error;
pub mod feature;
pub mod profile;
pub mod properties;

pub use error::ProfileError;
pub use feature::{Feature, FeatureKind};
pub use profile::{Profile, ProfileName};
pub use properties::{
    parse_feature, resolve_profile, SystemProperties, FEATURE_PROPERTY_PREFIX, PROFILE_PROPERTY,
};
