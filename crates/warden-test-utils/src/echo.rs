// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock SPI for deterministic lifecycle testing.
//!
//! [`EchoFactory`] implements the full factory contract with observable
//! counters, so tests can assert exactly which lifecycle hooks ran and
//! how often.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use warden_core::{ConfigScope, WardenError};
use warden_profile::Profile;
use warden_spi::{
    ConfigProperty, PropertyKind, Provider, ProviderFactory, Session, SessionFactory, Spi,
};

/// The mock extension point used across the framework's tests.
pub static ECHO_SPI: Spi<dyn EchoProvider> = Spi::new("echo", "warden.test.EchoProviderFactory");

/// Provider contract of [`ECHO_SPI`].
pub trait EchoProvider: Provider {
    /// Id of the factory that created this provider.
    fn id(&self) -> &str;
    /// Returns the message with the configured prefix applied.
    fn echo(&self, message: &str) -> String;
}

/// Shared lifecycle counters for [`EchoFactory`].
///
/// Cloning shares the underlying counters: a test keeps one clone and
/// hands another to the factory under test.
#[derive(Debug, Clone, Default)]
pub struct EchoProbe {
    /// `init` calls across all factories holding this probe.
    pub inits: Arc<AtomicUsize>,
    /// `post_init` calls.
    pub post_inits: Arc<AtomicUsize>,
    /// `create` calls.
    pub creates: Arc<AtomicUsize>,
    /// Provider `close` calls.
    pub provider_closes: Arc<AtomicUsize>,
    /// Factory `close` calls.
    pub factory_closes: Arc<AtomicUsize>,
}

/// Configurable mock factory for [`ECHO_SPI`].
///
/// Fresh factories have order 0, pass `init`, and are supported under
/// every profile; the builder methods flip each of those.
#[derive(Debug)]
pub struct EchoFactory {
    id: String,
    order: i32,
    supported: bool,
    fail_init: bool,
    prefix: String,
    probe: EchoProbe,
}

impl EchoFactory {
    /// Creates a factory with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order: 0,
            supported: true,
            fail_init: false,
            prefix: String::new(),
            probe: EchoProbe::default(),
        }
    }

    /// Sets the factory order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Makes `is_supported` return false.
    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    /// Makes `init` fail with a `Config` error.
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Attaches shared lifecycle counters.
    pub fn with_probe(mut self, probe: &EchoProbe) -> Self {
        self.probe = probe.clone();
        self
    }
}

struct Echo {
    id: String,
    prefix: String,
    closes: Arc<AtomicUsize>,
}

impl Provider for Echo {
    fn close(&self) -> Result<(), WardenError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl EchoProvider for Echo {
    fn id(&self) -> &str {
        &self.id
    }

    fn echo(&self, message: &str) -> String {
        format!("{}{}", self.prefix, message)
    }
}

#[async_trait]
impl ProviderFactory<dyn EchoProvider> for EchoFactory {
    fn id(&self) -> &str {
        &self.id
    }

    fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError> {
        self.probe.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(WardenError::Config("induced init failure".to_string()));
        }
        self.prefix = config.get_or("prefix", "");
        Ok(())
    }

    fn create(&self, _session: &Session) -> Result<Box<dyn EchoProvider>, WardenError> {
        self.probe.creates.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Echo {
            id: self.id.clone(),
            prefix: self.prefix.clone(),
            closes: self.probe.provider_closes.clone(),
        }))
    }

    fn post_init(&self, _sessions: &SessionFactory) -> Result<(), WardenError> {
        self.probe.post_inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn is_supported(&self, _profile: &Profile) -> bool {
        self.supported
    }

    fn operational_info(&self) -> BTreeMap<String, String> {
        let mut info = BTreeMap::new();
        if !self.prefix.is_empty() {
            info.insert("prefix".to_string(), self.prefix.clone());
        }
        info.insert(
            "echoes-created".to_string(),
            self.probe.creates.load(Ordering::SeqCst).to_string(),
        );
        info
    }

    fn config_metadata(&self) -> Vec<ConfigProperty> {
        vec![
            ConfigProperty::new("prefix", "Echo prefix", PropertyKind::String)
                .with_help_text("Prepended to every echoed message"),
        ]
    }

    async fn close(&self) -> Result<(), WardenError> {
        self.probe.factory_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_config::load_config_from_str;
    use warden_spi::RegistryBuilder;

    #[tokio::test]
    async fn factory_runs_full_lifecycle() {
        let probe = EchoProbe::default();
        let config = load_config_from_str(
            r#"
            [spi.echo.providers.echo]
            prefix = "> "
            "#,
        )
        .unwrap();

        let mut builder = RegistryBuilder::new();
        builder.register_spi(&ECHO_SPI).unwrap();
        builder
            .register_factory(&ECHO_SPI, Box::new(EchoFactory::new("echo").with_probe(&probe)))
            .unwrap();
        let sessions = builder.build(&config, Profile::default()).unwrap();
        assert_eq!(probe.inits.load(Ordering::SeqCst), 1);
        assert_eq!(probe.post_inits.load(Ordering::SeqCst), 1);

        let mut session = sessions.create_session();
        let echo = session.provider(&ECHO_SPI).unwrap();
        assert_eq!(echo.id(), "echo");
        assert_eq!(echo.echo("hello"), "> hello");
        session.close();
        assert_eq!(probe.creates.load(Ordering::SeqCst), 1);
        assert_eq!(probe.provider_closes.load(Ordering::SeqCst), 1);

        sessions.shutdown().await;
        assert_eq!(probe.factory_closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn builders_flip_support_and_init() {
        let mut factory = EchoFactory::new("flaky").with_order(25).unsupported().failing_init();
        assert_eq!(factory.order(), 25);
        assert!(!factory.is_supported(&Profile::default()));

        let scope = warden_core::MemoryScope::new();
        assert!(factory.init(&scope).is_err());
    }

    #[test]
    fn probe_is_shared_between_clones() {
        let probe = EchoProbe::default();
        let mut first = EchoFactory::new("first").with_probe(&probe);
        let mut second = EchoFactory::new("second").with_probe(&probe);
        let scope = warden_core::MemoryScope::new();
        first.init(&scope).unwrap();
        second.init(&scope).unwrap();
        assert_eq!(probe.inits.load(Ordering::SeqCst), 2);
    }
}
