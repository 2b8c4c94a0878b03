// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The SPI core: typed SPI handles, the factory/provider contract, the
//! process-wide registry, and per-request sessions.
//!
//! An SPI is a named extension point. Implementations register a
//! long-lived [`ProviderFactory`] through the [`RegistryBuilder`]; at
//! startup the builder filters by configuration and profile, initializes
//! each factory from its configuration scope, and resolves each SPI's
//! default implementation. Requests then open a [`Session`] and receive
//! short-lived, cached [`Provider`] instances.

pub mod builder;
pub mod provider;
pub mod registry;
pub mod session;

pub use builder::RegistryBuilder;
pub use provider::{ConfigProperty, PropertyKind, Provider, ProviderFactory, Spi};
pub use registry::{ProviderDescriptor, SpiDescriptor, SpiRegistry};
pub use session::{Session, SessionFactory};
