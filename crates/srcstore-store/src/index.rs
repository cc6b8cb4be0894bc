//! Index handles and the built-in index kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named artifact a store can hold. The handle only describes the
/// index; its presence on storage is determined by `Indexed::stat_index`.
pub trait Index: Send + Sync {
    /// Type label reported in index status records.
    fn type_name(&self) -> &str;
}

/// Built-in index kinds produced by the analysis toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Graph output of a unit (defs, refs)
    Graph,
    /// Dependency resolution results
    #[serde(rename = "depresolve")]
    DepResolve,
    /// Documentation blobs
    Docs,
    /// Def lookup by path and name across a version
    DefQuery,
    /// Which units own which files
    UnitFiles,
    /// Refs grouped by file
    RefFiles,
    /// Defs grouped by file
    DefsByFile,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Graph => "graph",
            IndexKind::DepResolve => "depresolve",
            IndexKind::Docs => "docs",
            IndexKind::DefQuery => "def_query",
            IndexKind::UnitFiles => "unit_files",
            IndexKind::RefFiles => "ref_files",
            IndexKind::DefsByFile => "defs_by_file",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Index for IndexKind {
    fn type_name(&self) -> &str {
        self.as_str()
    }
}

/// A declared index: its name within a store and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub kind: IndexKind,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, kind: IndexKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Declares an index named after its kind.
    pub fn of(kind: IndexKind) -> Self {
        Self::new(kind.as_str(), kind)
    }
}
