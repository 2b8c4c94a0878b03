// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The script SPI: deployed scripts exposed as providers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use warden_core::{ConfigScope, WardenError};
use warden_profile::{Feature, Profile};
use warden_spi::{ConfigProperty, PropertyKind, Provider, ProviderFactory, Session, Spi};

use crate::model::ScriptModel;

/// The deployed-script extension point.
pub static SCRIPT_SPI: Spi<dyn ScriptProvider> =
    Spi::new("script", "warden.scripts.ScriptProviderFactory");

/// A deployed script, ready for an engine to evaluate.
pub trait ScriptProvider: Provider {
    /// The script's identity and metadata.
    fn model(&self) -> &ScriptModel;
    /// The script source code.
    fn source(&self) -> &str;
}

/// Factory for one descriptor entry.
///
/// The factory id is the model id, so every deployed script is addressable
/// as `script/script-<file>`. Supported only when the `scripts` feature is
/// live.
#[derive(Debug)]
pub struct DeployedScriptFactory {
    model: Arc<ScriptModel>,
}

impl DeployedScriptFactory {
    /// Wraps a loaded script model.
    pub fn new(model: ScriptModel) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

struct DeployedScript {
    model: Arc<ScriptModel>,
}

impl Provider for DeployedScript {}

impl ScriptProvider for DeployedScript {
    fn model(&self) -> &ScriptModel {
        &self.model
    }

    fn source(&self) -> &str {
        &self.model.code
    }
}

#[async_trait]
impl ProviderFactory<dyn ScriptProvider> for DeployedScriptFactory {
    fn id(&self) -> &str {
        &self.model.id
    }

    fn init(&mut self, _config: &dyn ConfigScope) -> Result<(), WardenError> {
        // Deployed scripts are configured by their descriptor, not by scope.
        Ok(())
    }

    fn create(&self, _session: &Session) -> Result<Box<dyn ScriptProvider>, WardenError> {
        Ok(Box::new(DeployedScript {
            model: self.model.clone(),
        }))
    }

    fn is_supported(&self, profile: &Profile) -> bool {
        profile.is_enabled(Feature::Scripts)
    }

    fn operational_info(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("file".to_string(), self.model.file_name.clone()),
            ("category".to_string(), self.model.category.to_string()),
            ("digest".to_string(), self.model.digest.clone()),
        ])
    }

    fn config_metadata(&self) -> Vec<ConfigProperty> {
        vec![
            ConfigProperty::new("name", "Script name", PropertyKind::String),
            ConfigProperty::new("fileName", "Script file", PropertyKind::String),
            ConfigProperty::new("description", "Script description", PropertyKind::String),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptCategory;
    use warden_profile::ProfileName;

    fn factory() -> DeployedScriptFactory {
        DeployedScriptFactory::new(ScriptModel::new(
            ScriptCategory::Authenticator,
            Some("Logout Hook"),
            "logout.js",
            None,
            "logout()".to_string(),
        ))
    }

    #[test]
    fn factory_id_is_the_model_id() {
        assert_eq!(factory().id(), "script-logout.js");
    }

    #[test]
    fn supported_only_with_scripts_feature() {
        let factory = factory();
        assert!(!factory.is_supported(&Profile::default()));
        assert!(factory.is_supported(&Profile::new(ProfileName::Preview)));

        let mut overridden = Profile::default();
        overridden.set(Feature::Scripts, true);
        assert!(factory.is_supported(&overridden));
    }

    #[test]
    fn operational_info_reports_file_category_digest() {
        let info = factory().operational_info();
        assert_eq!(info.get("file").map(String::as_str), Some("logout.js"));
        assert_eq!(info.get("category").map(String::as_str), Some("authenticator"));
        assert_eq!(
            info.get("digest").map(String::as_str),
            Some("9b1aa004b70feb081140e8c71132747e1343c0427cbb65558e8f9994058578c8")
        );
    }

    #[test]
    fn config_metadata_describes_descriptor_fields() {
        let names: Vec<String> = factory()
            .config_metadata()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["name", "fileName", "description"]);
    }
}
