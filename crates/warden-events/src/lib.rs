// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit events and the event-listener SPI.
//!
//! This is the reference extension point shipped with the host: an
//! [`AuditEvent`] describes something that happened, and every provider
//! under [`EVENT_LISTENER_SPI`] sees it. The built-in `logging` listener
//! writes each event to the log at a configurable level.

pub mod audit;
pub mod listener;
pub mod logging;

pub use audit::{AuditEvent, AuditEventKind};
pub use listener::{EventListenerProvider, EVENT_LISTENER_SPI};
pub use logging::{LoggingEventListener, LoggingEventListenerFactory};
