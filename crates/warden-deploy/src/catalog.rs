// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Implementation catalog binding manifest names to registration code.
//!
//! The platform this framework models resolves implementation names against
//! a class path at runtime. A statically linked binary cannot, so the
//! catalog maps every deployable name to a function that registers the
//! matching SPI or factory, and deployment resolves manifest entries
//! against it.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};
use warden_core::WardenError;
use warden_spi::RegistryBuilder;

use crate::package::ProviderPackage;

/// Manifest interface under which SPI definitions themselves are listed.
///
/// The services manifest format pulls double duty: a manifest with this
/// file name lists SPI definitions to activate rather than factory
/// implementations, so one package can define an SPI that another
/// package implements.
pub const SPI_MANIFEST_INTERFACE: &str = "warden.provider.Spi";

/// Registration function bound to one catalog name.
pub type Binder = fn(&mut RegistryBuilder) -> Result<(), WardenError>;

/// Maps fully-qualified manifest names to registration functions.
#[derive(Default)]
pub struct Catalog {
    spis: BTreeMap<String, Binder>,
    factories: BTreeMap<String, BTreeMap<String, Binder>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an SPI definition under its manifest name.
    pub fn register_spi(
        &mut self,
        name: impl Into<String>,
        binder: Binder,
    ) -> Result<(), WardenError> {
        let name = name.into();
        if self.spis.insert(name.clone(), binder).is_some() {
            return Err(WardenError::Internal(format!(
                "catalog already has an SPI entry for '{name}'"
            )));
        }
        Ok(())
    }

    /// Registers a factory implementation under its interface and name.
    pub fn register_factory(
        &mut self,
        interface: impl Into<String>,
        implementation: impl Into<String>,
        binder: Binder,
    ) -> Result<(), WardenError> {
        let interface = interface.into();
        let implementation = implementation.into();
        let entries = self.factories.entry(interface.clone()).or_default();
        if entries.insert(implementation.clone(), binder).is_some() {
            return Err(WardenError::Internal(format!(
                "catalog already has '{implementation}' under '{interface}'"
            )));
        }
        Ok(())
    }

    /// Resolves every package manifest against the catalog and runs the
    /// matching binders.
    ///
    /// Two passes: the `warden.provider.Spi` manifests of all packages
    /// first, so a package may define an SPI that another package
    /// implements, then the factory manifests. Every package that deploys
    /// cleanly is recorded for `PackageDeployed` events.
    pub fn deploy(
        &self,
        packages: &[ProviderPackage],
        builder: &mut RegistryBuilder,
    ) -> Result<(), WardenError> {
        for package in packages {
            if let Some(manifest) = package.manifest(SPI_MANIFEST_INTERFACE) {
                for name in &manifest.implementations {
                    let binder = self.spis.get(name).ok_or_else(|| WardenError::Deployment {
                        package: package.name.clone(),
                        message: format!("unknown SPI '{name}'"),
                    })?;
                    debug!(package = %package.name, spi = %name, "binding SPI definition");
                    binder(builder)?;
                }
            }
        }

        for package in packages {
            for manifest in &package.manifests {
                if manifest.interface == SPI_MANIFEST_INTERFACE {
                    continue;
                }
                let entries = self.factories.get(&manifest.interface).ok_or_else(|| {
                    WardenError::Deployment {
                        package: package.name.clone(),
                        message: format!("no SPI accepts manifests for '{}'", manifest.interface),
                    }
                })?;
                for name in &manifest.implementations {
                    let binder = entries.get(name).ok_or_else(|| WardenError::Deployment {
                        package: package.name.clone(),
                        message: format!(
                            "unknown implementation '{}' for '{}'",
                            name, manifest.interface
                        ),
                    })?;
                    debug!(
                        package = %package.name,
                        interface = %manifest.interface,
                        implementation = %name,
                        "binding factory"
                    );
                    binder(builder)?;
                }
            }
            builder.record_package(package.name.clone());
            info!(package = %package.name, "deployed provider package");
        }

        Ok(())
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("spis", &self.spis.keys().collect::<Vec<_>>())
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
