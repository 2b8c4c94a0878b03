// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deployed script providers.
//!
//! A provider package may carry a `META-INF/warden-scripts.json` descriptor
//! naming script files under the `authenticators`, `policies`, and
//! `mappers` categories. Each entry becomes a provider under
//! [`SCRIPT_SPI`], addressable by its `script-<file>` id and gated by the
//! `scripts` feature.

pub mod descriptor;
pub mod loader;
pub mod model;
pub mod provider;

pub use descriptor::{
    parse_script_descriptor, DescriptorError, ScriptDescriptorFile, ScriptEntry, DESCRIPTOR_FILE,
};
pub use loader::deploy_package_scripts;
pub use model::{ScriptCategory, ScriptModel};
pub use provider::{DeployedScriptFactory, ScriptProvider, SCRIPT_SPI};
