// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles the SPI registry and session factory.
//!
//! Registration happens in two steps: SPIs are declared first, then
//! factories are attached to them. `build` runs the whole startup
//! sequence: filter by configuration and profile, `init` with the
//! provider scope, resolve defaults, `post_init`, dispatch lifecycle
//! events.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};
use warden_config::WardenConfig;
use warden_core::{ProviderEvent, ProviderEventListener, WardenError};
use warden_profile::Profile;

use crate::provider::{Provider, ProviderFactory, Spi};
use crate::registry::{ErasedFactory, FactoryEntry, FactoryHolder, SpiRecord, SpiRegistry};
use crate::session::SessionFactory;

struct PendingFactory {
    id: String,
    holder: Box<dyn ErasedFactory>,
}

struct PendingSpi {
    name: &'static str,
    interface: &'static str,
    internal: bool,
    provider_type: std::any::TypeId,
    factories: Vec<PendingFactory>,
}

/// Collects SPI and factory registrations, then builds the
/// [`SessionFactory`].
#[derive(Default)]
pub struct RegistryBuilder {
    records: Vec<PendingSpi>,
    index: BTreeMap<&'static str, usize>,
    listeners: Vec<Arc<dyn ProviderEventListener>>,
    packages: Vec<String>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an SPI. Must happen before any factory registers under it.
    pub fn register_spi<P: ?Sized + Provider>(&mut self, spi: &Spi<P>) -> Result<(), WardenError> {
        if self.index.contains_key(spi.name()) {
            return Err(WardenError::DuplicateSpi {
                spi: spi.name().to_string(),
            });
        }
        self.index.insert(spi.name(), self.records.len());
        self.records.push(PendingSpi {
            name: spi.name(),
            interface: spi.interface(),
            internal: spi.is_internal(),
            provider_type: spi.provider_type(),
            factories: Vec::new(),
        });
        debug!(spi = spi.name(), interface = spi.interface(), "SPI registered");
        Ok(())
    }

    /// Attaches a factory to a declared SPI.
    pub fn register_factory<P: ?Sized + Provider>(
        &mut self,
        spi: &Spi<P>,
        factory: Box<dyn ProviderFactory<P>>,
    ) -> Result<(), WardenError> {
        let Some(&slot) = self.index.get(spi.name()) else {
            return Err(WardenError::SpiNotFound {
                spi: spi.name().to_string(),
            });
        };
        let record = &mut self.records[slot];
        if record.provider_type != spi.provider_type() {
            return Err(WardenError::Internal(format!(
                "SPI '{}' is registered with a different provider type",
                spi.name()
            )));
        }
        let id = factory.id().to_string();
        if record.factories.iter().any(|f| f.id == id) {
            return Err(WardenError::DuplicateProvider {
                spi: spi.name().to_string(),
                provider: id,
            });
        }
        debug!(spi = spi.name(), provider = %id, "factory registered");
        record.factories.push(PendingFactory {
            id,
            holder: Box::new(FactoryHolder { inner: factory }),
        });
        Ok(())
    }

    /// Registers a lifecycle event listener.
    pub fn add_listener(&mut self, listener: Arc<dyn ProviderEventListener>) {
        self.listeners.push(listener);
    }

    /// Records a deployed package name for `PackageDeployed` events.
    ///
    /// Recording the same package twice keeps the first entry, so one
    /// event fires per package no matter how many deployment stages
    /// touched it.
    pub fn record_package(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.packages.contains(&name) {
            self.packages.push(name);
        }
    }

    /// Runs the startup sequence and hands back the session factory.
    ///
    /// Factories disabled by configuration or unsupported under `profile`
    /// are dropped before `init`; they do not participate in default
    /// resolution and are invisible to sessions.
    pub fn build(
        self,
        config: &WardenConfig,
        profile: Profile,
    ) -> Result<SessionFactory, WardenError> {
        let mut records = Vec::with_capacity(self.records.len());
        for pending in self.records {
            let mut entries: Vec<FactoryEntry> = Vec::new();
            for mut factory in pending.factories {
                if !config.provider_enabled(pending.name, &factory.id) {
                    debug!(
                        spi = pending.name,
                        provider = %factory.id,
                        "provider disabled by configuration"
                    );
                    continue;
                }
                if !factory.holder.is_supported(&profile) {
                    debug!(
                        spi = pending.name,
                        provider = %factory.id,
                        "provider not supported under active profile"
                    );
                    continue;
                }
                let scope = config.provider_scope(pending.name, &factory.id);
                factory
                    .holder
                    .init(&scope)
                    .map_err(|e| WardenError::ProviderInit {
                        spi: pending.name.to_string(),
                        provider: factory.id.clone(),
                        message: e.to_string(),
                    })?;
                let order = factory.holder.order();
                entries.push(FactoryEntry {
                    id: factory.id,
                    order,
                    holder: factory.holder,
                });
            }
            let default_id = resolve_default(pending.name, &entries, config)?;
            records.push(SpiRecord {
                name: pending.name,
                interface: pending.interface,
                internal: pending.internal,
                provider_type: pending.provider_type,
                factories: entries,
                default_id,
            });
        }

        for spi_name in config.spi.keys() {
            if !self.index.contains_key(spi_name.as_str()) {
                warn!(spi = %spi_name, "configuration for unregistered SPI");
            }
        }

        let registry = Arc::new(SpiRegistry::from_records(records));
        let sessions = SessionFactory::new(registry, self.listeners, profile);

        for record in sessions.registry().records() {
            for entry in &record.factories {
                entry
                    .holder
                    .post_init(&sessions)
                    .map_err(|e| WardenError::ProviderInit {
                        spi: record.name.to_string(),
                        provider: entry.id.clone(),
                        message: e.to_string(),
                    })?;
            }
        }

        sessions.dispatch(&ProviderEvent::PostInit);
        for package in &self.packages {
            sessions.dispatch(&ProviderEvent::PackageDeployed {
                package: package.clone(),
            });
        }
        Ok(sessions)
    }
}

/// Resolves one SPI's default provider id.
///
/// A configured override must name an active factory. Without an
/// override, the highest `order` wins; ties go to the lexicographically
/// smallest id so resolution is deterministic across runs.
fn resolve_default(
    spi: &str,
    entries: &[FactoryEntry],
    config: &WardenConfig,
) -> Result<Option<String>, WardenError> {
    if let Some(want) = config.default_provider(spi) {
        if entries.iter().any(|e| e.id == want) {
            return Ok(Some(want.to_string()));
        }
        return Err(WardenError::ProviderNotFound {
            spi: spi.to_string(),
            provider: want.to_string(),
        });
    }
    Ok(entries
        .iter()
        .max_by(|a, b| a.order.cmp(&b.order).then_with(|| b.id.cmp(&a.id)))
        .map(|e| e.id.clone()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use warden_core::ConfigScope;

    use super::*;
    use crate::session::Session;

    trait PingProvider: Provider + std::fmt::Debug {
        fn tag(&self) -> &str;
    }

    static PING_SPI: Spi<dyn PingProvider> =
        Spi::new("ping", "warden.test.PingProviderFactory");

    #[derive(Debug)]
    struct Ping {
        tag: String,
    }

    impl Provider for Ping {}

    impl PingProvider for Ping {
        fn tag(&self) -> &str {
            &self.tag
        }
    }

    #[derive(Default)]
    struct Lifecycle {
        inits: AtomicUsize,
        post_inits: AtomicUsize,
        factory_closes: AtomicUsize,
    }

    struct PingFactory {
        id: &'static str,
        order: i32,
        supported: bool,
        fail_init: bool,
        tag: String,
        lifecycle: Arc<Lifecycle>,
    }

    impl PingFactory {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                order: 0,
                supported: true,
                fail_init: false,
                tag: String::new(),
                lifecycle: Arc::new(Lifecycle::default()),
            }
        }

        fn with_order(mut self, order: i32) -> Self {
            self.order = order;
            self
        }

        fn unsupported(mut self) -> Self {
            self.supported = false;
            self
        }

        fn failing(mut self) -> Self {
            self.fail_init = true;
            self
        }

        fn with_lifecycle(mut self, lifecycle: &Arc<Lifecycle>) -> Self {
            self.lifecycle = Arc::clone(lifecycle);
            self
        }
    }

    #[async_trait]
    impl ProviderFactory<dyn PingProvider> for PingFactory {
        fn id(&self) -> &str {
            self.id
        }

        fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError> {
            self.lifecycle.inits.fetch_add(1, Ordering::SeqCst);
            if self.fail_init {
                return Err(WardenError::Config("induced init failure".to_string()));
            }
            self.tag = config.get_or("tag", self.id);
            Ok(())
        }

        fn post_init(&self, _sessions: &SessionFactory) -> Result<(), WardenError> {
            self.lifecycle.post_inits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn create(&self, _session: &Session) -> Result<Box<dyn PingProvider>, WardenError> {
            Ok(Box::new(Ping {
                tag: self.tag.clone(),
            }))
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn is_supported(&self, _profile: &Profile) -> bool {
            self.supported
        }

        async fn close(&self) -> Result<(), WardenError> {
            self.lifecycle.factory_closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<ProviderEvent>>,
    }

    impl ProviderEventListener for RecordingListener {
        fn on_event(&self, event: &ProviderEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn config(toml: &str) -> WardenConfig {
        warden_config::load_config_from_str(toml).unwrap()
    }

    #[test]
    fn duplicate_spi_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        let err = builder.register_spi(&PING_SPI).unwrap_err();
        assert!(matches!(err, WardenError::DuplicateSpi { ref spi } if spi == "ping"));
    }

    #[test]
    fn factory_needs_a_declared_spi() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap_err();
        assert!(matches!(err, WardenError::SpiNotFound { ref spi } if spi == "ping"));
    }

    #[test]
    fn duplicate_provider_id_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap();
        let err = builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap_err();
        assert!(matches!(
            err,
            WardenError::DuplicateProvider { ref provider, .. } if provider == "a"
        ));
    }

    #[test]
    fn build_initializes_factories_with_their_scope() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap();

        let config = config(
            r#"
            [spi.ping.providers.a]
            tag = "configured"
            "#,
        );
        let sessions = builder.build(&config, Profile::default()).unwrap();
        let mut session = sessions.create_session();
        let provider = session.provider(&PING_SPI).unwrap();
        assert_eq!(provider.tag(), "configured");
        session.close();
    }

    #[test]
    fn disabled_provider_never_initializes() {
        let lifecycle = Arc::new(Lifecycle::default());
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(
                &PING_SPI,
                Box::new(PingFactory::new("a").with_lifecycle(&lifecycle)),
            )
            .unwrap();

        let config = config(
            r#"
            [spi.ping.providers.a]
            enabled = false
            "#,
        );
        let sessions = builder.build(&config, Profile::default()).unwrap();
        assert_eq!(lifecycle.inits.load(Ordering::SeqCst), 0);
        assert_eq!(sessions.registry().default_id("ping"), None);
    }

    #[test]
    fn unsupported_provider_is_skipped() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a").unsupported()))
            .unwrap();

        let sessions = builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();
        let mut session = sessions.create_session();
        let err = session.provider(&PING_SPI).unwrap_err();
        assert!(matches!(
            err,
            WardenError::ProviderNotFound { ref provider, .. } if provider == "default"
        ));
        session.close();
    }

    #[test]
    fn init_failure_names_the_factory() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a").failing()))
            .unwrap();

        let err = builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap_err();
        match err {
            WardenError::ProviderInit {
                spi,
                provider,
                message,
            } => {
                assert_eq!(spi, "ping");
                assert_eq!(provider, "a");
                assert!(message.contains("induced init failure"));
            }
            other => panic!("expected ProviderInit, got {other:?}"),
        }
    }

    #[test]
    fn default_resolution_prefers_order_then_id() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("zeta").with_order(5)))
            .unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("alpha")))
            .unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("beta").with_order(5)))
            .unwrap();

        let sessions = builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();
        assert_eq!(sessions.registry().default_id("ping"), Some("beta"));
    }

    #[test]
    fn configured_default_overrides_order() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("fast").with_order(10)))
            .unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("slow")))
            .unwrap();

        let config = config(
            r#"
            [spi.ping]
            provider = "slow"
            "#,
        );
        let sessions = builder.build(&config, Profile::default()).unwrap();
        assert_eq!(sessions.registry().default_id("ping"), Some("slow"));
    }

    #[test]
    fn configured_default_must_name_an_active_factory() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap();

        let config = config(
            r#"
            [spi.ping]
            provider = "ghost"
            "#,
        );
        let err = builder.build(&config, Profile::default()).unwrap_err();
        assert!(matches!(
            err,
            WardenError::ProviderNotFound { ref provider, .. } if provider == "ghost"
        ));
    }

    #[test]
    fn post_init_runs_once_per_active_factory() {
        let lifecycle = Arc::new(Lifecycle::default());
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(
                &PING_SPI,
                Box::new(PingFactory::new("a").with_lifecycle(&lifecycle)),
            )
            .unwrap();
        builder
            .register_factory(
                &PING_SPI,
                Box::new(
                    PingFactory::new("b")
                        .unsupported()
                        .with_lifecycle(&lifecycle),
                ),
            )
            .unwrap();

        builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();
        assert_eq!(lifecycle.post_inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn post_init_can_reach_other_providers() {
        struct Wiring {
            saw: Arc<AtomicBool>,
        }

        impl ProviderFactory<dyn PingProvider> for Wiring {
            fn id(&self) -> &str {
                "wiring"
            }

            fn init(&mut self, _config: &dyn ConfigScope) -> Result<(), WardenError> {
                Ok(())
            }

            fn post_init(&self, sessions: &SessionFactory) -> Result<(), WardenError> {
                let mut session = sessions.create_session();
                let provider = session.provider_by_id(&PING_SPI, "a")?;
                self.saw.store(provider.tag() == "a", Ordering::SeqCst);
                session.close();
                Ok(())
            }

            fn create(&self, _session: &Session) -> Result<Box<dyn PingProvider>, WardenError> {
                Ok(Box::new(Ping {
                    tag: "wiring".to_string(),
                }))
            }
        }

        let saw = Arc::new(AtomicBool::new(false));
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(&PING_SPI, Box::new(PingFactory::new("a")))
            .unwrap();
        builder
            .register_factory(
                &PING_SPI,
                Box::new(Wiring {
                    saw: Arc::clone(&saw),
                }),
            )
            .unwrap();

        builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();
        assert!(saw.load(Ordering::SeqCst));
    }

    #[test]
    fn build_dispatches_post_init_then_packages() {
        let listener = Arc::new(RecordingListener::default());
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder.add_listener(listener.clone());
        builder.record_package("core-providers");
        builder.record_package("acme-extensions");

        builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();

        let events = listener.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ProviderEvent::PostInit,
                ProviderEvent::PackageDeployed {
                    package: "core-providers".to_string()
                },
                ProviderEvent::PackageDeployed {
                    package: "acme-extensions".to_string()
                },
            ]
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn config_for_unregistered_spi_warns() {
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();

        let config = config(
            r#"
            [spi.wormhole]
            provider = "quantum"
            "#,
        );
        builder.build(&config, Profile::default()).unwrap();
        assert!(logs_contain("configuration for unregistered SPI"));
    }

    #[tokio::test]
    async fn shutdown_closes_factories() {
        let lifecycle = Arc::new(Lifecycle::default());
        let mut builder = RegistryBuilder::new();
        builder.register_spi(&PING_SPI).unwrap();
        builder
            .register_factory(
                &PING_SPI,
                Box::new(PingFactory::new("a").with_lifecycle(&lifecycle)),
            )
            .unwrap();

        let sessions = builder
            .build(&WardenConfig::default(), Profile::default())
            .unwrap();
        sessions.shutdown().await;
        assert_eq!(lifecycle.factory_closes.load(Ordering::SeqCst), 1);
    }
}
