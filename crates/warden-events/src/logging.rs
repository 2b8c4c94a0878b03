// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in logging event listener.
//!
//! Mirrors the classic "log every audit event" listener: success events at
//! one level, error events at another, both configurable per deployment.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::Level;
use warden_core::{ConfigScope, WardenError};
use warden_spi::{ConfigProperty, PropertyKind, Provider, ProviderFactory, Session};

use crate::audit::AuditEvent;
use crate::listener::EventListenerProvider;

// tracing requires a const level per call site, so dynamic dispatch is a
// match with one arm per level.
macro_rules! audit_log {
    ($macro:ident, $event:expr) => {
        tracing::$macro!(
            id = %$event.id,
            kind = %$event.kind,
            realm = %$event.realm,
            client = $event.client.as_deref().unwrap_or("-"),
            user = $event.user.as_deref().unwrap_or("-"),
            ip = $event.ip_address.as_deref().unwrap_or("-"),
            details = ?$event.details,
            "audit event"
        )
    };
}

/// Factory for the `logging` event listener.
///
/// Holds the emitted-event counter shared by every provider it creates.
#[derive(Debug)]
pub struct LoggingEventListenerFactory {
    success_level: Level,
    error_level: Level,
    emitted: Arc<AtomicU64>,
}

impl LoggingEventListenerFactory {
    /// Creates the factory with its default levels.
    pub fn new() -> Self {
        Self {
            success_level: Level::DEBUG,
            error_level: Level::WARN,
            emitted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Events emitted through providers of this factory so far.
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl Default for LoggingEventListenerFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(config: &dyn ConfigScope, key: &str, default: &str) -> Result<Level, WardenError> {
    let raw = config.get_or(key, default);
    Level::from_str(&raw)
        .map_err(|_| WardenError::Config(format!("invalid log level '{raw}' for '{key}'")))
}

/// Logs each audit event at the configured level.
pub struct LoggingEventListener {
    success_level: Level,
    error_level: Level,
    emitted: Arc<AtomicU64>,
}

impl Provider for LoggingEventListener {}

impl EventListenerProvider for LoggingEventListener {
    fn on_event(&self, event: &AuditEvent) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        let level = if event.kind.is_error() {
            self.error_level
        } else {
            self.success_level
        };
        match level {
            Level::ERROR => audit_log!(error, event),
            Level::WARN => audit_log!(warn, event),
            Level::INFO => audit_log!(info, event),
            Level::DEBUG => audit_log!(debug, event),
            Level::TRACE => audit_log!(trace, event),
        }
    }
}

#[async_trait]
impl ProviderFactory<dyn EventListenerProvider> for LoggingEventListenerFactory {
    fn id(&self) -> &str {
        "logging"
    }

    fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError> {
        self.success_level = parse_level(config, "success-level", "debug")?;
        self.error_level = parse_level(config, "error-level", "warn")?;
        Ok(())
    }

    fn create(&self, _session: &Session) -> Result<Box<dyn EventListenerProvider>, WardenError> {
        Ok(Box::new(LoggingEventListener {
            success_level: self.success_level,
            error_level: self.error_level,
            emitted: self.emitted.clone(),
        }))
    }

    fn operational_info(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "success-level".to_string(),
                self.success_level.to_string().to_lowercase(),
            ),
            (
                "error-level".to_string(),
                self.error_level.to_string().to_lowercase(),
            ),
            ("events-emitted".to_string(), self.emitted().to_string()),
        ])
    }

    fn config_metadata(&self) -> Vec<ConfigProperty> {
        vec![
            ConfigProperty::new("success-level", "Success log level", PropertyKind::String)
                .with_help_text("Level for non-error events")
                .with_default_value("debug"),
            ConfigProperty::new("error-level", "Error log level", PropertyKind::String)
                .with_help_text("Level for error events")
                .with_default_value("warn"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditEventKind;
    use crate::listener::EVENT_LISTENER_SPI;
    use warden_config::load_config_from_str;
    use warden_core::MemoryScope;
    use warden_profile::Profile;
    use warden_spi::RegistryBuilder;

    #[test]
    fn init_reads_levels_from_scope() {
        let mut factory = LoggingEventListenerFactory::new();
        let scope = MemoryScope::new()
            .with("success-level", "info")
            .with("error-level", "error");
        factory.init(&scope).unwrap();

        let info = factory.operational_info();
        assert_eq!(info.get("success-level").map(String::as_str), Some("info"));
        assert_eq!(info.get("error-level").map(String::as_str), Some("error"));
    }

    #[test]
    fn init_defaults_to_debug_and_warn() {
        let mut factory = LoggingEventListenerFactory::new();
        factory.init(&MemoryScope::new()).unwrap();

        let info = factory.operational_info();
        assert_eq!(info.get("success-level").map(String::as_str), Some("debug"));
        assert_eq!(info.get("error-level").map(String::as_str), Some("warn"));
    }

    #[test]
    fn init_rejects_unknown_level() {
        let mut factory = LoggingEventListenerFactory::new();
        let scope = MemoryScope::new().with("success-level", "loud");
        let err = factory.init(&scope).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[tracing_test::traced_test]
    #[test]
    fn listener_logs_events_and_counts_them() {
        let config = load_config_from_str(
            r#"
            [spi.event-listener.providers.logging]
            success-level = "info"
            "#,
        )
        .unwrap();

        let mut builder = RegistryBuilder::new();
        builder.register_spi(&EVENT_LISTENER_SPI).unwrap();
        builder
            .register_factory(
                &EVENT_LISTENER_SPI,
                Box::new(LoggingEventListenerFactory::new()),
            )
            .unwrap();
        let sessions = builder.build(&config, Profile::default()).unwrap();

        let mut session = sessions.create_session();
        let listener = session.provider(&EVENT_LISTENER_SPI).unwrap();
        listener.on_event(
            &AuditEvent::new(AuditEventKind::Login, "acme")
                .with_client("portal")
                .with_user("u-113"),
        );
        listener.on_event(&AuditEvent::new(AuditEventKind::LoginError, "acme"));
        session.close();

        assert!(logs_contain("audit event"));
        assert!(logs_contain("acme"));

        let registry = sessions.registry().describe();
        let spi = registry.iter().find(|s| s.name == "event-listener").unwrap();
        let provider = spi.providers.iter().find(|p| p.id == "logging").unwrap();
        assert_eq!(
            provider.operational_info.get("events-emitted").map(String::as_str),
            Some("2")
        );
    }
}
