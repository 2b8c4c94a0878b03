// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unified error type for the Warden provider framework.

use thiserror::Error;
use warden_profile::ProfileError;

/// Errors produced across the Warden workspace.
#[derive(Debug, Error)]
pub enum WardenError {
    /// A configuration value is malformed or out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// Feature or profile resolution failed.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// An operation referenced an SPI that is not registered.
    #[error("spi not found: {spi}")]
    SpiNotFound {
        /// Name of the missing SPI.
        spi: String,
    },

    /// No provider with the given id exists under the SPI.
    #[error("provider not found: {spi}/{provider}")]
    ProviderNotFound {
        /// SPI the lookup ran against.
        spi: String,
        /// Requested provider id, or `default` for default resolution.
        provider: String,
    },

    /// An SPI name was registered a second time.
    #[error("spi already registered: {spi}")]
    DuplicateSpi {
        /// The colliding SPI name.
        spi: String,
    },

    /// Two factories under one SPI share an id.
    #[error("provider already registered: {spi}/{provider}")]
    DuplicateProvider {
        /// SPI the factories were registered under.
        spi: String,
        /// The colliding provider id.
        provider: String,
    },

    /// A factory failed during `init` or `post_init`.
    #[error("provider init failed: {spi}/{provider}: {message}")]
    ProviderInit {
        /// SPI of the failing factory.
        spi: String,
        /// Id of the failing factory.
        provider: String,
        /// Underlying failure.
        message: String,
    },

    /// A provider requested itself while it was being created.
    #[error("provider creation cycle: {spi}/{provider}")]
    ProviderCycle {
        /// SPI of the cyclic provider.
        spi: String,
        /// Id of the cyclic provider.
        provider: String,
    },

    /// A provider was requested from a session that is closing.
    #[error("session is closed")]
    SessionClosed,

    /// Provider package discovery or binding failed.
    #[error("deployment of '{package}' failed: {message}")]
    Deployment {
        /// Package name, or the path when no package is identifiable.
        package: String,
        /// What went wrong.
        message: String,
    },

    /// Invariant violation inside the framework itself.
    #[error("internal error: {0}")]
    Internal(String),
}
