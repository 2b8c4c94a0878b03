// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat key-value configuration scopes handed to provider factories.
//!
//! A factory sees exactly one scope at `init` time: the subtree of the
//! server configuration addressed to its SPI and provider id. Scopes are
//! read-only and string-oriented; typed getters coerce where the value
//! admits it and fail loudly where it does not.

use std::collections::BTreeMap;

use crate::error::WardenError;

/// Read-only view of one provider's configuration.
///
/// `get` is the primitive accessor; the typed getters have default
/// implementations in terms of it, so simple backends only implement
/// `get`, `scope`, and `keys`.
pub trait ConfigScope: Send + Sync {
    /// Raw value for `key`. Scalar values are rendered as strings;
    /// structured values (tables, arrays) are not visible through `get`.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, or `default` when the key is absent.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Integer value for `key`.
    ///
    /// Accepts native integers and strings that parse as `i64`.
    fn get_int(&self, key: &str) -> Result<Option<i64>, WardenError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                WardenError::Config(format!("expected integer for '{key}', got '{raw}'"))
            }),
        }
    }

    /// Boolean value for `key`.
    ///
    /// Accepts native booleans and the strings `true`/`false`.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, WardenError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<bool>().map(Some).map_err(|_| {
                WardenError::Config(format!("expected boolean for '{key}', got '{raw}'"))
            }),
        }
    }

    /// Multi-valued entry for `key`.
    ///
    /// A single scalar is treated as a comma-separated list; entries are
    /// trimmed and empty entries dropped. Backends with native arrays
    /// override this.
    fn get_array(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Nested sub-scope under `name`. Empty when absent.
    fn scope(&self, name: &str) -> Box<dyn ConfigScope>;

    /// Sorted top-level keys of this scope.
    fn keys(&self) -> Vec<String>;
}

/// In-memory scope backed by string maps.
///
/// Serves as the empty scope for factories with no configuration and as
/// the scope of choice in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScope {
    values: BTreeMap<String, String>,
    children: BTreeMap<String, MemoryScope>,
}

impl MemoryScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key-value pair (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Adds a nested sub-scope (builder style).
    pub fn with_scope(mut self, name: impl Into<String>, scope: MemoryScope) -> Self {
        self.children.insert(name.into(), scope);
        self
    }
}

impl ConfigScope for MemoryScope {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn scope(&self, name: &str) -> Box<dyn ConfigScope> {
        Box::new(self.children.get(name).cloned().unwrap_or_default())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
