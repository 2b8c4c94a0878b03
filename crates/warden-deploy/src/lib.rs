// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider package deployment for the Warden framework.
//!
//! Packages are exploded directories discovered under the configured
//! provider directories. Their services manifests name SPI definitions and
//! factory implementations; the [`Catalog`] resolves those names to
//! compiled-in registration functions and binds everything into a registry
//! builder. Built-in providers ride the same path through
//! [`ProviderPackage::synthetic`].

pub mod catalog;
pub mod package;
pub mod services;

pub use catalog::{Binder, Catalog, SPI_MANIFEST_INTERFACE};
pub use package::{discover_packages, ProviderPackage, SERVICES_DIR};
pub use services::{parse_services_manifest, ManifestError, ServicesManifest};
