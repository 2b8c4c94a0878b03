// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Warden provider framework.
//!
//! This crate provides the unified error type, the flat configuration
//! scope handed to provider factories, common identifier types, and the
//! framework lifecycle events. Every other Warden crate builds on these.

pub mod error;
pub mod events;
pub mod scope;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WardenError;
pub use events::{ProviderEvent, ProviderEventListener};
pub use scope::{ConfigScope, MemoryScope};
pub use types::{EventId, SessionId};
