//! Source unit stores.

use super::artifacts::{ArtifactDir, DATA_EXTENSION, INDEX_EXTENSION};
use super::{IndexLayout, DATA_DIR, INDEXES_DIR};
use crate::store::{Indexed, Store};
use std::path::PathBuf;
use std::sync::Arc;

/// Raw unit store: the toolchain's analysis outputs under `data/`.
pub struct FsUnitStore {
    data: ArtifactDir,
}

impl FsUnitStore {
    pub fn new(dir: PathBuf, layout: Arc<IndexLayout>) -> Self {
        Self {
            data: ArtifactDir::new(dir.join(DATA_DIR), layout.unit_data.clone(), DATA_EXTENSION),
        }
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data.artifact_path(name)
    }
}

impl Store for FsUnitStore {
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        Some(&self.data)
    }
}

/// Unit store with derived indexes under `indexes/`, wrapping the raw
/// [`FsUnitStore`].
pub struct IndexedUnitStore {
    indexes: ArtifactDir,
    fs: FsUnitStore,
}

impl IndexedUnitStore {
    pub fn new(dir: PathBuf, layout: Arc<IndexLayout>) -> Self {
        let indexes = ArtifactDir::new(dir.join(INDEXES_DIR), layout.unit.clone(), INDEX_EXTENSION);
        Self {
            indexes,
            fs: FsUnitStore::new(dir, layout),
        }
    }

    pub fn unit_store(&self) -> &FsUnitStore {
        &self.fs
    }

    pub fn index_path(&self, name: &str) -> PathBuf {
        self.indexes.artifact_path(name)
    }
}

impl Store for IndexedUnitStore {
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        Some(&self.indexes)
    }

    fn lower(&self) -> Option<&dyn Store> {
        Some(&self.fs)
    }
}
