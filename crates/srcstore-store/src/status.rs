//! Index status records and the criteria that filter them.

use crate::unit::UnitId;
use serde::{Deserialize, Serialize};

/// Describes one index and whether its backing artifact exists.
///
/// `repo`, `version` and `unit` are only set down to the depth at which
/// the record was found relative to the queried store. A record from a
/// query against a single unit store leaves all three empty because the
/// scope already implies them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Repository the index belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Version (commit ID) the index belongs to
    #[serde(rename = "commitID", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Source unit the index belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitId>,

    /// Whether the index needs to be (re)built
    pub stale: bool,

    /// Index name, unique within its store
    pub name: String,

    /// Index type label
    #[serde(rename = "type")]
    pub index_type: String,

    /// Length in bytes of the backing artifact
    #[serde(default, skip_serializing_if = "size_is_empty")]
    pub size: Option<u64>,

    /// Failure encountered while determining this index's status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn size_is_empty(size: &Option<u64>) -> bool {
    matches!(size, None | Some(0))
}

impl IndexStatus {
    /// A record with no status observation yet.
    pub fn new(name: impl Into<String>, index_type: impl Into<String>) -> Self {
        Self {
            repo: None,
            version: None,
            unit: None,
            stale: false,
            name: name.into(),
            index_type: index_type.into(),
            size: None,
            error: None,
        }
    }

    /// Whether the status could not be determined.
    pub fn is_indeterminate(&self) -> bool {
        self.error.is_some()
    }
}

/// Restricts which indexes a listing returns. Non-empty conditions are
/// ANDed together.
///
/// `repo`, `version` and `unit` are point lookups: they select which child
/// store gets opened at all, so sibling stores are never touched. `name`
/// and `index_type` are substring matches; empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCriteria {
    pub repo: Option<String>,
    pub version: Option<String>,
    pub unit: Option<UnitId>,
    pub name: String,
    pub index_type: String,
    pub stale: Option<bool>,
}

impl IndexCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = index_type.into();
        self
    }

    pub fn with_stale(mut self, stale: bool) -> Self {
        self.stale = Some(stale);
        self
    }

    pub fn matches_name(&self, name: &str) -> bool {
        name.contains(self.name.as_str())
    }

    pub fn matches_type(&self, index_type: &str) -> bool {
        index_type.contains(self.index_type.as_str())
    }

    pub fn matches_stale(&self, stale: bool) -> bool {
        self.stale.map_or(true, |want| want == stale)
    }
}
