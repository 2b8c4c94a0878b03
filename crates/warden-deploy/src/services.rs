// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Services manifest parsing.
//!
//! A services manifest is a text file inside a provider package whose file
//! name is a fully-qualified factory-interface name and whose body lists one
//! fully-qualified implementation name per line. Lexing is `ServiceLoader`
//! compatible: UTF-8 with an optional leading BOM, `#` starts a comment that
//! runs to the end of the line, surrounding whitespace is insignificant, and
//! blank lines are skipped.

use tracing::debug;

/// A parsed services manifest from a provider package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesManifest {
    /// Fully-qualified interface name, taken from the manifest file name.
    pub interface: String,
    /// Implementation names in file order, duplicates removed.
    pub implementations: Vec<String>,
}

/// Error raised when a manifest body fails to lex.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A line names something that is not a dotted identifier sequence.
    #[error("line {line}: '{name}' is not a valid implementation name")]
    InvalidName {
        /// One-based line number in the manifest body.
        line: usize,
        /// The offending token.
        name: String,
    },
}

/// Parses a services manifest body into implementation names.
///
/// Names come back in file order with duplicates dropped (first occurrence
/// wins). An empty manifest is valid and yields no names.
pub fn parse_services_manifest(content: &str) -> Result<Vec<String>, ManifestError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut names: Vec<String> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        if !is_qualified_name(name) {
            return Err(ManifestError::InvalidName {
                line: index + 1,
                name: name.to_string(),
            });
        }
        if names.iter().any(|seen| seen == name) {
            debug!(name, "duplicate implementation name in manifest");
            continue;
        }
        names.push(name.to_string());
    }

    Ok(names)
}

/// Whether `name` is a dot-separated sequence of identifiers.
///
/// Identifiers follow the `[A-Za-z_$][A-Za-z0-9_$]*` shape, so valid names
/// look like `warden.events.LoggingEventListenerProviderFactory`.
pub(crate) fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
