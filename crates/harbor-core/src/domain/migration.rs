//! Migration steps and their ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a migration step.
///
/// Keys that parse as unsigned integers compare numerically (`2 < 10`);
/// all other keys compare lexically, and numeric keys sort before named ones.
/// The textual form is what gets recorded as "applied" on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MigrationKey(String);

impl MigrationKey {
    /// Create a key from its textual form.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as recorded in the migrations table.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for MigrationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for MigrationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<String> for MigrationKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MigrationKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<MigrationKey> for String {
    fn from(value: MigrationKey) -> Self {
        value.0
    }
}

impl fmt::Display for MigrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named unit of migration code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStep {
    pub key: MigrationKey,
    pub code: String,
}

impl MigrationStep {
    pub fn new(key: impl Into<MigrationKey>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
        }
    }
}

/// Sort steps into ascending key order.
///
/// Duplicate keys keep their relative order; the server only ever applies
/// the first one because the second sees the key already recorded.
pub fn sort_steps(steps: &mut [MigrationStep]) {
    steps.sort_by(|a, b| a.key.cmp(&b.key));
}
