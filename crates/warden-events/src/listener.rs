// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event-listener SPI.

use warden_spi::{Provider, Spi};

use crate::audit::AuditEvent;

/// The audit event listener extension point.
pub static EVENT_LISTENER_SPI: Spi<dyn EventListenerProvider> = Spi::new(
    "event-listener",
    "warden.events.EventListenerProviderFactory",
);

/// Receives every audit event emitted during a session.
pub trait EventListenerProvider: Provider {
    /// Called once per emitted event.
    fn on_event(&self, event: &AuditEvent);
}
