// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process bootstrap: profile resolution, package deployment, registry
//! build.
//!
//! The SPIs and factories compiled into this binary deploy through the
//! same manifest and catalog machinery as packages found on disk. The
//! only special thing about them is that their package is synthetic:
//! one deployment path, whether code ships in the server or beside it.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};
use warden_config::WardenConfig;
use warden_core::{ProviderEvent, ProviderEventListener, WardenError};
use warden_deploy::{
    discover_packages, Catalog, ProviderPackage, ServicesManifest, SPI_MANIFEST_INTERFACE,
};
use warden_events::{LoggingEventListenerFactory, EVENT_LISTENER_SPI};
use warden_profile::{resolve_profile, Profile, SystemProperties};
use warden_scripts::{deploy_package_scripts, SCRIPT_SPI};
use warden_spi::{RegistryBuilder, SessionFactory};

/// Manifest name of the built-in event-listener SPI definition.
pub const EVENT_LISTENER_SPI_NAME: &str = "warden.events.EventListenerSpi";

/// Manifest name of the built-in script SPI definition.
pub const SCRIPT_SPI_NAME: &str = "warden.scripts.ScriptSpi";

/// Manifest name of the logging event-listener factory.
pub const LOGGING_FACTORY_NAME: &str = "warden.events.LoggingEventListenerProviderFactory";

/// Resolves the effective profile from configuration and `-D` properties.
pub fn resolve(config: &WardenConfig, defines: &[String]) -> Result<Profile, WardenError> {
    let props = SystemProperties::parse(defines)?;
    let profile = resolve_profile(
        Some(&config.profile.name),
        &config.profile.features,
        &props,
    )?;
    Ok(profile)
}

/// The catalog of implementations compiled into this binary.
pub fn builtin_catalog() -> Result<Catalog, WardenError> {
    let mut catalog = Catalog::new();
    catalog.register_spi(EVENT_LISTENER_SPI_NAME, bind_event_listener_spi)?;
    catalog.register_spi(SCRIPT_SPI_NAME, bind_script_spi)?;
    catalog.register_factory(
        EVENT_LISTENER_SPI.interface(),
        LOGGING_FACTORY_NAME,
        bind_logging_factory,
    )?;
    Ok(catalog)
}

fn bind_event_listener_spi(builder: &mut RegistryBuilder) -> Result<(), WardenError> {
    builder.register_spi(&EVENT_LISTENER_SPI)
}

fn bind_script_spi(builder: &mut RegistryBuilder) -> Result<(), WardenError> {
    builder.register_spi(&SCRIPT_SPI)
}

fn bind_logging_factory(builder: &mut RegistryBuilder) -> Result<(), WardenError> {
    builder.register_factory(
        &EVENT_LISTENER_SPI,
        Box::new(LoggingEventListenerFactory::new()),
    )
}

/// The synthetic package carrying everything compiled into the binary.
fn builtin_package() -> ProviderPackage {
    ProviderPackage::synthetic(
        "builtin",
        vec![
            ServicesManifest {
                interface: SPI_MANIFEST_INTERFACE.to_string(),
                implementations: vec![
                    EVENT_LISTENER_SPI_NAME.to_string(),
                    SCRIPT_SPI_NAME.to_string(),
                ],
            },
            ServicesManifest {
                interface: EVENT_LISTENER_SPI.interface().to_string(),
                implementations: vec![LOGGING_FACTORY_NAME.to_string()],
            },
        ],
    )
}

/// Logs framework lifecycle events as they dispatch.
struct TracingEventListener;

impl ProviderEventListener for TracingEventListener {
    fn on_event(&self, event: &ProviderEvent) {
        match event {
            ProviderEvent::PostInit => debug!("registry post-init complete"),
            ProviderEvent::PackageDeployed { package } => {
                debug!(package = %package, "package deployed");
            }
            ProviderEvent::Shutdown => debug!("registry shutting down"),
        }
    }
}

/// Deploys every package and builds the process-wide session factory.
///
/// Deployment order: the built-in package first, then packages from the
/// configured directories in discovery order. Script descriptors bind
/// after the manifests of all packages.
pub fn build_sessions(
    config: &WardenConfig,
    profile: Profile,
) -> Result<SessionFactory, WardenError> {
    let directories: Vec<PathBuf> = config
        .providers
        .directories
        .iter()
        .map(PathBuf::from)
        .collect();
    let mut packages = vec![builtin_package()];
    packages.extend(discover_packages(&directories)?);

    let mut builder = RegistryBuilder::new();
    builder.add_listener(Arc::new(TracingEventListener));
    builtin_catalog()?.deploy(&packages, &mut builder)?;
    for package in &packages {
        deploy_package_scripts(&mut builder, package, &profile)?;
    }

    let sessions = builder.build(config, profile)?;
    info!(
        spis = sessions.registry().len(),
        packages = packages.len(),
        "provider registry ready"
    );
    Ok(sessions)
}
