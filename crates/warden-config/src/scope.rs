// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ConfigScope`] backed by a TOML table.
//!
//! Provider tables in `warden.toml` land here verbatim; the factory sees
//! them through the scope trait and stays oblivious to TOML.

use toml::Value;
use warden_core::{ConfigScope, WardenError};

/// Flat key-value scope over a [`toml::Table`].
///
/// Scalar values (strings, integers, floats, booleans, datetimes) are
/// visible through [`ConfigScope::get`] as their TOML string rendering.
/// Nested tables are reachable via [`ConfigScope::scope`] only; arrays
/// are reachable through [`ConfigScope::get_array`] only.
#[derive(Debug, Clone, Default)]
pub struct TomlScope {
    table: toml::Table,
}

impl TomlScope {
    /// Wraps an existing table.
    pub fn new(table: toml::Table) -> Self {
        Self { table }
    }

    /// The underlying table.
    pub fn table(&self) -> &toml::Table {
        &self.table
    }

    fn coerce(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Datetime(d) => Some(d.to_string()),
            Value::Array(_) | Value::Table(_) => None,
        }
    }

    fn type_str(value: &Value) -> &'static str {
        match value {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }
}

impl ConfigScope for TomlScope {
    fn get(&self, key: &str) -> Option<String> {
        self.table.get(key).and_then(Self::coerce)
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>, WardenError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
                WardenError::Config(format!("expected integer for '{key}', got '{s}'"))
            }),
            Some(other) => Err(WardenError::Config(format!(
                "expected integer for '{key}', got {}",
                Self::type_str(other)
            ))),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, WardenError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(WardenError::Config(format!(
                    "expected boolean for '{key}', got '{other}'"
                ))),
            },
            Some(other) => Err(WardenError::Config(format!(
                "expected boolean for '{key}', got {}",
                Self::type_str(other)
            ))),
        }
    }

    fn get_array(&self, key: &str) -> Option<Vec<String>> {
        match self.table.get(key) {
            Some(Value::Array(items)) => Some(items.iter().filter_map(Self::coerce).collect()),
            Some(Value::String(s)) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Some(other) => Self::coerce(other).map(|v| vec![v]),
            None => None,
        }
    }

    fn scope(&self, name: &str) -> Box<dyn ConfigScope> {
        let nested = match self.table.get(name) {
            Some(Value::Table(t)) => t.clone(),
            _ => toml::Table::new(),
        };
        Box::new(TomlScope::new(nested))
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.table.keys().cloned().collect();
        keys.sort();
        keys
    }
}
