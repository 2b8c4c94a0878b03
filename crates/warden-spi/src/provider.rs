// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The factory/provider contract.
//!
//! An SPI names one pluggable capability of the server. Each implementation
//! of that capability supplies a [`ProviderFactory`]: a long-lived object,
//! exactly one per process, configured once at startup from a flat key-value
//! scope. The factory hands out [`Provider`] instances, one per session,
//! which live only as long as the request they serve.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use strum::{Display, EnumString};
use warden_core::{ConfigScope, WardenError};
use warden_profile::Profile;

use crate::session::{Session, SessionFactory};

/// Typed handle naming one SPI.
///
/// Handles are declared as `pub static` items so every crate refers to the
/// same name/interface pair:
///
/// ```ignore
/// pub static THEME_SPI: Spi<dyn ThemeProvider> =
///     Spi::new("theme", "warden.theme.ThemeProviderFactory");
/// ```
///
/// `name` keys the registry; `interface` is the dotted factory-interface
/// name that services manifest paths encode.
pub struct Spi<P: ?Sized + Provider> {
    name: &'static str,
    interface: &'static str,
    internal: bool,
    _provider: PhantomData<fn(&P)>,
}

impl<P: ?Sized + Provider> Spi<P> {
    /// Declares a public SPI.
    pub const fn new(name: &'static str, interface: &'static str) -> Self {
        Self {
            name,
            interface,
            internal: false,
            _provider: PhantomData,
        }
    }

    /// Declares an internal SPI, annotated as such by tooling.
    pub const fn internal(name: &'static str, interface: &'static str) -> Self {
        Self {
            name,
            interface,
            internal: true,
            _provider: PhantomData,
        }
    }

    /// Registry key of this SPI, e.g. `event-listener`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully-qualified factory-interface name, e.g.
    /// `warden.events.EventListenerProviderFactory`.
    pub fn interface(&self) -> &'static str {
        self.interface
    }

    /// Whether this SPI is internal to the server.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub(crate) fn provider_type(&self) -> TypeId {
        TypeId::of::<P>()
    }
}

impl<P: ?Sized + Provider> fmt::Debug for Spi<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spi")
            .field("name", &self.name)
            .field("interface", &self.interface)
            .field("internal", &self.internal)
            .finish()
    }
}

/// Short-lived role of the contract: one instance per session.
///
/// Providers must not be held beyond the session that created them; the
/// session closes them when it closes. `close` is synchronous so that
/// sessions stay usable from synchronous lifecycle hooks such as
/// `post_init`.
pub trait Provider: Send + Sync + 'static {
    /// Releases per-session resources. Called once by the owning session.
    fn close(&self) -> Result<(), WardenError> {
        Ok(())
    }
}

/// Long-lived role of the contract: one instance per process per
/// implementation.
///
/// The factory holds configuration and state shared by every provider it
/// creates. Lifecycle: `init` (once, with the configuration scope), then
/// `post_init` (after all factories initialized), then any number of
/// `create` calls, then `close` at shutdown.
#[async_trait]
pub trait ProviderFactory<P: ?Sized + Provider>: Send + Sync + 'static {
    /// Implementation id, unique within the SPI.
    fn id(&self) -> &str;

    /// Initializes the factory from its configuration scope.
    ///
    /// Called exactly once, before any `create`. Expensive shared state
    /// belongs here, not in `create`.
    fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError>;

    /// Creates one provider for `session`.
    ///
    /// May request other providers from the session; requesting this
    /// provider itself is a cycle and fails.
    fn create(&self, session: &Session) -> Result<Box<P>, WardenError>;

    /// Called after every factory's `init` has completed.
    ///
    /// The session factory is fully assembled at this point, so
    /// implementations may create sessions and reach other providers.
    fn post_init(&self, _sessions: &SessionFactory) -> Result<(), WardenError> {
        Ok(())
    }

    /// Priority for default-provider resolution; highest wins.
    fn order(&self) -> i32 {
        0
    }

    /// Whether this implementation is available under `profile`.
    ///
    /// Unsupported factories are skipped entirely at registry build time.
    fn is_supported(&self, _profile: &Profile) -> bool {
        true
    }

    /// Runtime details surfaced by the `providers` command.
    fn operational_info(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Describes the configuration keys this factory understands.
    fn config_metadata(&self) -> Vec<ConfigProperty> {
        Vec::new()
    }

    /// Releases process-wide resources at shutdown.
    async fn close(&self) -> Result<(), WardenError> {
        Ok(())
    }
}

/// One configuration key a factory understands, for tooling display.
#[derive(Debug, Clone)]
pub struct ConfigProperty {
    /// Key name as it appears in the provider scope.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Longer help text, empty when the label says it all.
    pub help_text: String,
    /// Value shape.
    pub kind: PropertyKind,
    /// Default applied when the key is absent.
    pub default_value: Option<String>,
    /// Whether tooling must mask the value.
    pub secret: bool,
}

impl ConfigProperty {
    /// Creates a property description (builder style).
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            help_text: String::new(),
            kind,
            default_value: None,
            secret: false,
        }
    }

    /// Sets the help text.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Sets the default value.
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Marks the value as secret.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Value shape of a [`ConfigProperty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyKind {
    /// Free-form string.
    String,
    /// `true` or `false`.
    Boolean,
    /// Integer value.
    Integer,
    /// Comma-separated or native list of strings.
    List,
    /// Secret string, masked in tooling output.
    Password,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    trait ProbeProvider: Provider {}

    static PROBE_SPI: Spi<dyn ProbeProvider> =
        Spi::new("probe", "warden.test.ProbeProviderFactory");
    static HIDDEN_SPI: Spi<dyn ProbeProvider> =
        Spi::internal("hidden", "warden.test.HiddenProviderFactory");

    #[test]
    fn spi_handles_are_const_constructible() {
        assert_eq!(PROBE_SPI.name(), "probe");
        assert_eq!(PROBE_SPI.interface(), "warden.test.ProbeProviderFactory");
        assert!(!PROBE_SPI.is_internal());
        assert!(HIDDEN_SPI.is_internal());
    }

    #[test]
    fn spi_debug_omits_the_provider_type() {
        let rendered = format!("{PROBE_SPI:?}");
        assert!(rendered.contains("probe"));
        assert!(rendered.contains("internal: false"));
    }

    #[test]
    fn config_property_builder_round_trips() {
        let property = ConfigProperty::new("api-key", "API key", PropertyKind::Password)
            .with_help_text("Key used to call the upstream directory")
            .with_default_value("unset")
            .secret();
        assert_eq!(property.name, "api-key");
        assert_eq!(property.kind, PropertyKind::Password);
        assert_eq!(property.default_value.as_deref(), Some("unset"));
        assert!(property.secret);
    }

    #[test]
    fn property_kind_strings_round_trip() {
        assert_eq!(PropertyKind::Boolean.to_string(), "boolean");
        assert_eq!(PropertyKind::from_str("list").unwrap(), PropertyKind::List);
        assert!(PropertyKind::from_str("blob").is_err());
    }
}
