// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide SPI registry.
//!
//! Built once by [`crate::builder::RegistryBuilder`] and immutable after.
//! Factories are stored behind the object-safe [`ErasedFactory`] trait;
//! sessions recover the typed [`crate::provider::ProviderFactory`] by
//! downcasting the holder, which is why every record carries the `TypeId`
//! of its provider type.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;

use async_trait::async_trait;
use warden_core::{ConfigScope, WardenError};
use warden_profile::Profile;

use crate::provider::{ConfigProperty, Provider, ProviderFactory};
use crate::session::SessionFactory;

/// Object-safe view of a factory, independent of its provider type.
///
/// Everything except `create` is reachable through this trait; `create`
/// is typed and goes through a [`FactoryHolder`] downcast instead.
#[async_trait]
pub(crate) trait ErasedFactory: Send + Sync {
    fn id(&self) -> &str;
    fn order(&self) -> i32;
    fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError>;
    fn post_init(&self, sessions: &SessionFactory) -> Result<(), WardenError>;
    fn is_supported(&self, profile: &Profile) -> bool;
    fn operational_info(&self) -> BTreeMap<String, String>;
    fn config_metadata(&self) -> Vec<ConfigProperty>;
    async fn close(&self) -> Result<(), WardenError>;
    fn as_any(&self) -> &dyn Any;
}

/// Typed wrapper stored behind [`ErasedFactory`].
pub(crate) struct FactoryHolder<P: ?Sized + Provider> {
    pub(crate) inner: Box<dyn ProviderFactory<P>>,
}

#[async_trait]
impl<P: ?Sized + Provider> ErasedFactory for FactoryHolder<P> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn order(&self) -> i32 {
        self.inner.order()
    }

    fn init(&mut self, config: &dyn ConfigScope) -> Result<(), WardenError> {
        self.inner.init(config)
    }

    fn post_init(&self, sessions: &SessionFactory) -> Result<(), WardenError> {
        self.inner.post_init(sessions)
    }

    fn is_supported(&self, profile: &Profile) -> bool {
        self.inner.is_supported(profile)
    }

    fn operational_info(&self) -> BTreeMap<String, String> {
        self.inner.operational_info()
    }

    fn config_metadata(&self) -> Vec<ConfigProperty> {
        self.inner.config_metadata()
    }

    async fn close(&self) -> Result<(), WardenError> {
        self.inner.close().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One active factory within an SPI record.
pub(crate) struct FactoryEntry {
    pub(crate) id: String,
    /// Captured once after `init`; stable for the registry's lifetime.
    pub(crate) order: i32,
    pub(crate) holder: Box<dyn ErasedFactory>,
}

/// One registered SPI with its active factories.
pub(crate) struct SpiRecord {
    pub(crate) name: &'static str,
    pub(crate) interface: &'static str,
    pub(crate) internal: bool,
    pub(crate) provider_type: TypeId,
    /// Active factories in registration order (the initialization order).
    pub(crate) factories: Vec<FactoryEntry>,
    pub(crate) default_id: Option<String>,
}

impl SpiRecord {
    pub(crate) fn factory(&self, id: &str) -> Option<&FactoryEntry> {
        self.factories.iter().find(|entry| entry.id == id)
    }
}

/// Immutable registry of every SPI and its active factories.
///
/// Records keep registration order so that `post_init` and shutdown walk
/// factories in initialization order and its reverse; name lookups go
/// through the index.
pub struct SpiRegistry {
    records: Vec<SpiRecord>,
    index: BTreeMap<&'static str, usize>,
}

impl SpiRegistry {
    pub(crate) fn from_records(records: Vec<SpiRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name, i))
            .collect();
        Self { records, index }
    }

    pub(crate) fn record(&self, name: &str) -> Option<&SpiRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub(crate) fn records(&self) -> &[SpiRecord] {
        &self.records
    }

    /// Whether an SPI with `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All registered SPI names, sorted.
    pub fn spi_names(&self) -> Vec<&str> {
        self.index.keys().copied().collect()
    }

    /// Resolved default provider id for `name`, if any.
    pub fn default_id(&self, name: &str) -> Option<&str> {
        self.record(name).and_then(|r| r.default_id.as_deref())
    }

    /// Returns the number of registered SPIs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no SPIs are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Describes every SPI for display, sorted by name.
    pub fn describe(&self) -> Vec<SpiDescriptor> {
        let mut spis: Vec<SpiDescriptor> = self
            .records
            .iter()
            .map(|record| {
                let mut providers: Vec<ProviderDescriptor> = record
                    .factories
                    .iter()
                    .map(|entry| ProviderDescriptor {
                        id: entry.id.clone(),
                        order: entry.order,
                        default: record.default_id.as_deref() == Some(entry.id.as_str()),
                        operational_info: entry.holder.operational_info(),
                        config_metadata: entry.holder.config_metadata(),
                    })
                    .collect();
                providers.sort_by(|a, b| b.order.cmp(&a.order).then_with(|| a.id.cmp(&b.id)));
                SpiDescriptor {
                    name: record.name.to_string(),
                    interface: record.interface.to_string(),
                    internal: record.internal,
                    default_provider: record.default_id.clone(),
                    providers,
                }
            })
            .collect();
        spis.sort_by(|a, b| a.name.cmp(&b.name));
        spis
    }
}

impl std::fmt::Debug for SpiRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpiRegistry")
            .field("spis", &self.spi_names())
            .finish()
    }
}

/// Display description of one SPI.
#[derive(Debug, Clone)]
pub struct SpiDescriptor {
    /// SPI name.
    pub name: String,
    /// Fully-qualified factory-interface name.
    pub interface: String,
    /// Whether the SPI is internal.
    pub internal: bool,
    /// Resolved default provider id.
    pub default_provider: Option<String>,
    /// Providers in resolution order: descending order, then id.
    pub providers: Vec<ProviderDescriptor>,
}

/// Display description of one provider under an SPI.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    /// Implementation id.
    pub id: String,
    /// Priority used during default resolution.
    pub order: i32,
    /// Whether this provider is the SPI's default.
    pub default: bool,
    /// Factory-reported runtime details.
    pub operational_info: BTreeMap<String, String>,
    /// Factory-reported configuration keys.
    pub config_metadata: Vec<ConfigProperty>,
}
