//! Version (tree) stores.

use super::artifacts::{ArtifactDir, INDEX_EXTENSION};
use super::path::{child_dirs, escape_component, unescape_component};
use super::unit::IndexedUnitStore;
use super::{IndexLayout, INDEXES_DIR, UNITS_DIR};
use crate::store::{Children, Indexed, Store, UnitOpener};
use crate::unit::UnitId;
use crate::StoreError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Raw version store: opens the source units under `units/<type>/<name>`.
pub struct FsTreeStore {
    dir: PathBuf,
    layout: Arc<IndexLayout>,
}

impl FsTreeStore {
    pub fn new(dir: PathBuf, layout: Arc<IndexLayout>) -> Self {
        Self { dir, layout }
    }

    /// Directory of one unit's store.
    pub fn unit_dir(&self, unit: &UnitId) -> PathBuf {
        self.dir
            .join(UNITS_DIR)
            .join(escape_component(&unit.unit_type))
            .join(escape_component(&unit.name))
    }
}

impl Store for FsTreeStore {
    fn as_unit_opener(&self) -> Option<&dyn UnitOpener> {
        Some(self)
    }
}

#[async_trait]
impl UnitOpener for FsTreeStore {
    fn open_unit(&self, unit: &UnitId) -> Box<dyn Store> {
        Box::new(IndexedUnitStore::new(
            self.unit_dir(unit),
            self.layout.clone(),
        ))
    }

    async fn open_all_units(&self) -> Result<Children<UnitId>, StoreError> {
        let units_dir = self.dir.join(UNITS_DIR);
        let mut units = Children::new();

        for type_entry in child_dirs(&units_dir).await? {
            let unit_type = unescape_component(&type_entry)?;
            let type_dir = units_dir.join(&type_entry);

            for name_entry in child_dirs(&type_dir).await? {
                let unit = UnitId::new(unescape_component(&name_entry)?, unit_type.clone());
                units.insert(
                    unit,
                    Box::new(IndexedUnitStore::new(
                        type_dir.join(&name_entry),
                        self.layout.clone(),
                    )) as Box<dyn Store>,
                );
            }
        }

        debug!(version = ?self.dir, count = units.len(), "Opened unit stores");
        Ok(units)
    }
}

/// Version store with version-wide indexes under `indexes/`, wrapping the
/// raw [`FsTreeStore`] that opens its units.
pub struct IndexedTreeStore {
    indexes: ArtifactDir,
    fs: FsTreeStore,
}

impl IndexedTreeStore {
    pub fn new(dir: PathBuf, layout: Arc<IndexLayout>) -> Self {
        let indexes = ArtifactDir::new(
            dir.join(INDEXES_DIR),
            layout.version.clone(),
            INDEX_EXTENSION,
        );
        Self {
            indexes,
            fs: FsTreeStore::new(dir, layout),
        }
    }

    pub fn index_path(&self, name: &str) -> PathBuf {
        self.indexes.artifact_path(name)
    }
}

impl Store for IndexedTreeStore {
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        Some(&self.indexes)
    }

    fn lower(&self) -> Option<&dyn Store> {
        Some(&self.fs)
    }
}
