// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What a deployed script is once its descriptor entry and source are read.

use sha2::{Digest, Sha256};
use strum::{Display, EnumString};

/// Where in the platform a deployed script plugs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ScriptCategory {
    /// Custom authentication step.
    Authenticator,
    /// Authorization policy.
    Policy,
    /// Protocol claim mapper.
    Mapper,
}

/// A deployed script with its source and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptModel {
    /// Provider id: `script-` followed by the file name.
    pub id: String,
    /// Display name, the descriptor's `name` or the file name.
    pub name: String,
    /// File name inside the package.
    pub file_name: String,
    /// Description from the descriptor, when present.
    pub description: Option<String>,
    /// Category the descriptor listed the script under.
    pub category: ScriptCategory,
    /// Script source code.
    pub code: String,
    /// Lowercase hex SHA-256 of the source bytes.
    pub digest: String,
}

impl ScriptModel {
    /// Builds the model for one descriptor entry with its loaded source.
    pub fn new(
        category: ScriptCategory,
        name: Option<&str>,
        file_name: &str,
        description: Option<&str>,
        code: String,
    ) -> Self {
        let digest = hex::encode(Sha256::digest(code.as_bytes()));
        Self {
            id: format!("script-{file_name}"),
            name: name.unwrap_or(file_name).to_string(),
            file_name: file_name.to_string(),
            description: description.map(str::to_string),
            category,
            code,
            digest,
        }
    }
}
