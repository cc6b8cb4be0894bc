//! Filesystem-backed stores.
//!
//! Layout under a store root:
//!
//! ```text
//! repos/<repo>/versions/<version>/indexes/<name>.idx
//! repos/<repo>/versions/<version>/units/<type>/<name>/indexes/<name>.idx
//! repos/<repo>/versions/<version>/units/<type>/<name>/data/<name>.json
//! ```
//!
//! Identifiers are escaped so that each occupies one path component.

mod artifacts;
mod path;
mod repo;
mod unit;
mod version;

pub use artifacts::{ArtifactDir, DATA_EXTENSION, INDEX_EXTENSION};
pub use path::{escape_component, unescape_component};
pub use repo::{FsMultiRepoStore, FsRepoStore};
pub use unit::{FsUnitStore, IndexedUnitStore};
pub use version::{FsTreeStore, IndexedTreeStore};

use crate::index::{IndexDef, IndexKind};
use crate::store::Store;
use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub(crate) const REPOS_DIR: &str = "repos";
pub(crate) const VERSIONS_DIR: &str = "versions";
pub(crate) const UNITS_DIR: &str = "units";
pub(crate) const INDEXES_DIR: &str = "indexes";
pub(crate) const DATA_DIR: &str = "data";

/// Which indexes each store level declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexLayout {
    /// Version-wide indexes
    #[serde(default = "default_version_indexes")]
    pub version: Vec<IndexDef>,

    /// Derived per-unit indexes
    #[serde(default = "default_unit_indexes")]
    pub unit: Vec<IndexDef>,

    /// Raw per-unit analysis outputs
    #[serde(default = "default_unit_data")]
    pub unit_data: Vec<IndexDef>,
}

fn default_version_indexes() -> Vec<IndexDef> {
    vec![
        IndexDef::of(IndexKind::UnitFiles),
        IndexDef::of(IndexKind::DefQuery),
    ]
}

fn default_unit_indexes() -> Vec<IndexDef> {
    vec![
        IndexDef::of(IndexKind::DefsByFile),
        IndexDef::of(IndexKind::RefFiles),
        IndexDef::of(IndexKind::Docs),
    ]
}

fn default_unit_data() -> Vec<IndexDef> {
    vec![
        IndexDef::of(IndexKind::Graph),
        IndexDef::of(IndexKind::DepResolve),
    ]
}

impl Default for IndexLayout {
    fn default() -> Self {
        Self {
            version: default_version_indexes(),
            unit: default_unit_indexes(),
            unit_data: default_unit_data(),
        }
    }
}

/// The hierarchy level a store directory represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    MultiRepo,
    Repo,
    Version,
    Unit,
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreScope::MultiRepo => "multi-repo",
            StoreScope::Repo => "repo",
            StoreScope::Version => "version",
            StoreScope::Unit => "unit",
        };
        f.write_str(s)
    }
}

/// Determines which level of the hierarchy `dir` is.
///
/// Root and repo directories are recognized by their `repos/` and
/// `versions/` children, version and unit directories by where they sit
/// (`versions/<version>` and `versions/<version>/units/<type>/<name>`).
pub async fn detect_scope(dir: &Path) -> Result<StoreScope, StoreError> {
    let dir = match tokio::fs::canonicalize(dir).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(dir.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    if is_dir(&dir.join(REPOS_DIR)).await {
        return Ok(StoreScope::MultiRepo);
    }
    if is_dir(&dir.join(VERSIONS_DIR)).await {
        return Ok(StoreScope::Repo);
    }

    // Unit first: a unit whose type is `versions` also sits under a
    // `versions` directory
    let ancestor = |n: usize| dir.ancestors().nth(n).and_then(Path::file_name);
    if ancestor(2) == Some(OsStr::new(UNITS_DIR)) && ancestor(4) == Some(OsStr::new(VERSIONS_DIR)) {
        return Ok(StoreScope::Unit);
    }
    if ancestor(1) == Some(OsStr::new(VERSIONS_DIR)) {
        return Ok(StoreScope::Version);
    }

    Err(StoreError::NotAStore(dir))
}

/// Opens the store rooted at `dir`, whatever level it is.
pub async fn open_store(dir: &Path, layout: Arc<IndexLayout>) -> Result<Arc<dyn Store>, StoreError> {
    let scope = detect_scope(dir).await?;
    let dir = dir.to_path_buf();
    debug!(dir = ?dir, scope = %scope, "Opening store");

    let store: Arc<dyn Store> = match scope {
        StoreScope::MultiRepo => Arc::new(FsMultiRepoStore::new(dir, layout)),
        StoreScope::Repo => Arc::new(FsRepoStore::new(dir, layout)),
        StoreScope::Version => Arc::new(IndexedTreeStore::new(dir, layout)),
        StoreScope::Unit => Arc::new(IndexedUnitStore::new(dir, layout)),
    };
    Ok(store)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
