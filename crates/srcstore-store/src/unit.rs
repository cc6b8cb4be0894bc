//! Source unit identity.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a source unit within a version by its name and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    /// Unit name (often a package or module path)
    pub name: String,
    /// Unit type (the toolchain that produced it, e.g. `go`, `python`)
    #[serde(rename = "type")]
    pub unit_type: String,
}

impl UnitId {
    pub fn new(name: impl Into<String>, unit_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_type: unit_type.into(),
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.unit_type)
    }
}

impl FromStr for UnitId {
    type Err = StoreError;

    /// Parses `name@type`. The type is taken after the last `@`, so names
    /// may themselves contain `@`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, unit_type) = s
            .rsplit_once('@')
            .ok_or_else(|| StoreError::InvalidId(format!("expected NAME@TYPE, got {:?}", s)))?;

        if name.is_empty() || unit_type.is_empty() {
            return Err(StoreError::InvalidId(format!(
                "unit name and type must be non-empty: {:?}",
                s
            )));
        }

        Ok(Self::new(name, unit_type))
    }
}
