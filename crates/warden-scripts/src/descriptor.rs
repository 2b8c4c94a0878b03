// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The script descriptor: `META-INF/warden-scripts.json`.
//!
//! The descriptor maps script files to named, described entries under the
//! `authenticators`, `policies`, and `mappers` categories. Its shape is an
//! external contract, so parsing is strict: unknown keys are rejected at
//! both levels.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::model::ScriptCategory;

/// Path of the descriptor inside a provider package.
pub const DESCRIPTOR_FILE: &str = "META-INF/warden-scripts.json";

/// One script entry under a descriptor category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEntry {
    /// Display name; the file name stands in when absent.
    pub name: Option<String>,
    /// Script file, resolved against the package root.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Human-readable description.
    pub description: Option<String>,
}

/// Parsed `warden-scripts.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDescriptorFile {
    /// Custom authentication steps.
    #[serde(default)]
    pub authenticators: Vec<ScriptEntry>,
    /// Authorization policies.
    #[serde(default)]
    pub policies: Vec<ScriptEntry>,
    /// Protocol claim mappers.
    #[serde(default)]
    pub mappers: Vec<ScriptEntry>,
}

impl ScriptDescriptorFile {
    /// All entries in category order: authenticators, policies, mappers.
    pub fn entries(&self) -> impl Iterator<Item = (ScriptCategory, &ScriptEntry)> {
        let authenticators = self
            .authenticators
            .iter()
            .map(|e| (ScriptCategory::Authenticator, e));
        let policies = self.policies.iter().map(|e| (ScriptCategory::Policy, e));
        let mappers = self.mappers.iter().map(|e| (ScriptCategory::Mapper, e));
        authenticators.chain(policies).chain(mappers)
    }

    /// Whether no category has entries.
    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty() && self.policies.is_empty() && self.mappers.is_empty()
    }
}

/// Error raised for a descriptor that does not parse or cannot deploy.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// The JSON body failed to deserialize.
    #[error("invalid script descriptor: {0}")]
    Json(#[from] serde_json::Error),
    /// An entry has an empty `fileName`.
    #[error("entry {entry} under '{category}' has an empty fileName")]
    EmptyFileName {
        /// Descriptor key of the offending category.
        category: &'static str,
        /// One-based position within the category array.
        entry: usize,
    },
    /// Two entries in one category name the same file.
    #[error("duplicate script file '{file_name}' under '{category}'")]
    DuplicateFile {
        /// Descriptor key of the offending category.
        category: &'static str,
        /// The repeated file name.
        file_name: String,
    },
}

/// Parses and validates a descriptor body.
pub fn parse_script_descriptor(content: &str) -> Result<ScriptDescriptorFile, DescriptorError> {
    let descriptor: ScriptDescriptorFile = serde_json::from_str(content)?;
    for (category, entries) in [
        ("authenticators", &descriptor.authenticators),
        ("policies", &descriptor.policies),
        ("mappers", &descriptor.mappers),
    ] {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.file_name.trim().is_empty() {
                return Err(DescriptorError::EmptyFileName {
                    category,
                    entry: index + 1,
                });
            }
            if !seen.insert(entry.file_name.as_str()) {
                return Err(DescriptorError::DuplicateFile {
                    category,
                    file_name: entry.file_name.clone(),
                });
            }
        }
    }
    Ok(descriptor)
}
