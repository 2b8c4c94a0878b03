// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised while resolving features and profiles.

use thiserror::Error;

/// Feature and profile resolution failures.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The configured profile name is not one we ship.
    #[error("unknown profile '{name}' (expected 'default' or 'preview')")]
    UnknownProfile {
        /// The rejected profile name.
        name: String,
    },

    /// A feature override referenced a feature that does not exist.
    #[error("unknown feature '{name}'{}", match .suggestion {
        Some(s) => format!(", did you mean '{s}'?"),
        None => String::new(),
    })]
    UnknownFeature {
        /// The rejected feature name.
        name: String,
        /// Closest known feature name, if any is close enough.
        suggestion: Option<String>,
    },

    /// A feature override carried a value other than enabled/disabled.
    #[error("invalid value '{value}' for '{property}' (expected 'enabled' or 'disabled')")]
    InvalidValue {
        /// The feature or property the value was given for.
        property: String,
        /// The rejected value.
        value: String,
    },

    /// A system property under the warden.profile namespace is malformed.
    #[error("malformed system property '{property}'")]
    InvalidProperty {
        /// The offending property key or argument.
        property: String,
    },
}
