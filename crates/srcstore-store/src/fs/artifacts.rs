//! Declared artifacts stored as files in one directory.

use super::path::escape_component;
use crate::index::{Index, IndexDef};
use crate::store::Indexed;
use crate::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// File extension for derived index artifacts.
pub const INDEX_EXTENSION: &str = "idx";

/// File extension for raw analysis output artifacts.
pub const DATA_EXTENSION: &str = "json";

/// A directory holding one file per declared artifact.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    dir: PathBuf,
    defs: Vec<IndexDef>,
    extension: &'static str,
}

impl ArtifactDir {
    pub fn new(dir: PathBuf, defs: Vec<IndexDef>, extension: &'static str) -> Self {
        Self {
            dir,
            defs,
            extension,
        }
    }

    /// Path of the artifact backing the named index.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", escape_component(name), self.extension))
    }
}

#[async_trait]
impl Indexed for ArtifactDir {
    fn indexes(&self) -> HashMap<String, Arc<dyn Index>> {
        self.defs
            .iter()
            .map(|def| (def.name.clone(), Arc::new(def.kind) as Arc<dyn Index>))
            .collect()
    }

    async fn stat_index(&self, name: &str) -> Result<u64, StoreError> {
        if !self.defs.iter().any(|def| def.name == name) {
            return Err(StoreError::InvalidId(format!("no index named {:?}", name)));
        }

        let path = self.artifact_path(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(path)),
            Err(e) => Err(e.into()),
        }
    }
}
