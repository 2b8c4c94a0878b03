// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding descriptor entries into the registry.

use std::fs;

use tracing::{debug, info};
use warden_core::WardenError;
use warden_deploy::ProviderPackage;
use warden_profile::{Feature, Profile};
use warden_spi::RegistryBuilder;

use crate::descriptor::{parse_script_descriptor, DESCRIPTOR_FILE};
use crate::model::ScriptModel;
use crate::provider::{DeployedScriptFactory, SCRIPT_SPI};

/// Property that switches script deployment on.
const ENABLE_HINT: &str = "-Dwarden.profile.feature.scripts=enabled";

/// Registers a factory for every script the package's descriptor lists.
///
/// Packages without a root or without a descriptor bind nothing. A
/// descriptor in a process whose profile has the `scripts` feature
/// disabled is an error rather than a silent skip, so a misconfigured
/// deployment fails at startup instead of quietly losing scripts.
/// Returns how many scripts were registered.
pub fn deploy_package_scripts(
    builder: &mut RegistryBuilder,
    package: &ProviderPackage,
    profile: &Profile,
) -> Result<usize, WardenError> {
    let Some(root) = &package.root else {
        return Ok(0);
    };
    let path = root.join(DESCRIPTOR_FILE);
    if !path.is_file() {
        return Ok(0);
    }
    if !profile.is_enabled(Feature::Scripts) {
        return Err(WardenError::Deployment {
            package: package.name.clone(),
            message: format!(
                "package ships a script descriptor but the scripts feature is disabled; start with {ENABLE_HINT}"
            ),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| WardenError::Deployment {
        package: package.name.clone(),
        message: format!("cannot read script descriptor: {e}"),
    })?;
    let descriptor = parse_script_descriptor(&content).map_err(|e| WardenError::Deployment {
        package: package.name.clone(),
        message: e.to_string(),
    })?;

    let mut deployed = 0;
    for (category, entry) in descriptor.entries() {
        let file = root.join(&entry.file_name);
        let code = fs::read_to_string(&file).map_err(|e| WardenError::Deployment {
            package: package.name.clone(),
            message: format!("script file '{}': {e}", entry.file_name),
        })?;
        let model = ScriptModel::new(
            category,
            entry.name.as_deref(),
            &entry.file_name,
            entry.description.as_deref(),
            code,
        );
        debug!(
            package = %package.name,
            script = %model.id,
            category = %category,
            "registering deployed script"
        );
        builder.register_factory(&SCRIPT_SPI, Box::new(DeployedScriptFactory::new(model)))?;
        deployed += 1;
    }
    if deployed > 0 {
        info!(package = %package.name, scripts = deployed, "deployed scripts");
    }
    Ok(deployed)
}
