// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test fixtures for Warden crates.
//!
//! Provides an instrumented mock SPI, an event recorder, and disposable
//! on-disk provider packages for fast, deterministic tests.
//!
//! # Components
//!
//! - [`EchoFactory`] + [`ECHO_SPI`] - mock extension point with lifecycle counters
//! - [`RecordingListener`] - captures framework lifecycle events
//! - [`TempPackage`] - provider package fixtures on disk

pub mod echo;
pub mod package;
pub mod recording;

pub use echo::{EchoFactory, EchoProbe, EchoProvider, ECHO_SPI};
pub use package::TempPackage;
pub use recording::RecordingListener;
