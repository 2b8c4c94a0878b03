// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Framework lifecycle events.
//!
//! The session factory dispatches these at well-defined points so that
//! factories and host code can react to the registry coming up, packages
//! being bound, and the process shutting down.

/// Event emitted by the session factory at lifecycle boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Every active factory has completed `post_init`.
    PostInit,
    /// A provider package was bound into the registry.
    PackageDeployed {
        /// Name of the deployed package.
        package: String,
    },
    /// The session factory is shutting down; factories close next.
    Shutdown,
}

/// Observer for [`ProviderEvent`]s.
///
/// Listeners are registered before the registry is built and invoked
/// synchronously, in registration order.
pub trait ProviderEventListener: Send + Sync {
    /// Called once per dispatched event.
    fn on_event(&self, event: &ProviderEvent);
}
