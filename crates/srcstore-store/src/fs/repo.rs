//! Multi-repository and repository stores.

use super::path::{child_dirs, escape_component, unescape_component};
use super::version::IndexedTreeStore;
use super::{IndexLayout, REPOS_DIR, VERSIONS_DIR};
use crate::store::{Children, RepoOpener, Store, VersionOpener};
use crate::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Root store holding any number of repositories under `repos/`.
pub struct FsMultiRepoStore {
    root: PathBuf,
    layout: Arc<IndexLayout>,
}

impl FsMultiRepoStore {
    pub fn new(root: PathBuf, layout: Arc<IndexLayout>) -> Self {
        Self { root, layout }
    }

    /// Directory of one repository's store.
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.root.join(REPOS_DIR).join(escape_component(repo))
    }
}

impl Store for FsMultiRepoStore {
    fn as_repo_opener(&self) -> Option<&dyn RepoOpener> {
        Some(self)
    }
}

#[async_trait]
impl RepoOpener for FsMultiRepoStore {
    fn open_repo(&self, repo: &str) -> Box<dyn Store> {
        Box::new(FsRepoStore::new(self.repo_dir(repo), self.layout.clone()))
    }

    async fn open_all_repos(&self) -> Result<Children<String>, StoreError> {
        let dir = self.root.join(REPOS_DIR);
        let mut repos = Children::new();
        for entry in child_dirs(&dir).await? {
            let repo = unescape_component(&entry)?;
            repos.insert(
                repo,
                Box::new(FsRepoStore::new(dir.join(&entry), self.layout.clone())) as Box<dyn Store>,
            );
        }
        debug!(root = ?self.root, count = repos.len(), "Opened repo stores");
        Ok(repos)
    }
}

/// Store for one repository, holding its versions under `versions/`.
pub struct FsRepoStore {
    dir: PathBuf,
    layout: Arc<IndexLayout>,
}

impl FsRepoStore {
    pub fn new(dir: PathBuf, layout: Arc<IndexLayout>) -> Self {
        Self { dir, layout }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory of one version's store.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.dir.join(VERSIONS_DIR).join(escape_component(version))
    }
}

impl Store for FsRepoStore {
    fn as_version_opener(&self) -> Option<&dyn VersionOpener> {
        Some(self)
    }
}

#[async_trait]
impl VersionOpener for FsRepoStore {
    fn open_version(&self, version: &str) -> Box<dyn Store> {
        Box::new(IndexedTreeStore::new(
            self.version_dir(version),
            self.layout.clone(),
        ))
    }

    async fn open_all_versions(&self) -> Result<Children<String>, StoreError> {
        let dir = self.dir.join(VERSIONS_DIR);
        let mut versions = Children::new();
        for entry in child_dirs(&dir).await? {
            let version = unescape_component(&entry)?;
            versions.insert(
                version,
                Box::new(IndexedTreeStore::new(dir.join(&entry), self.layout.clone()))
                    as Box<dyn Store>,
            );
        }
        debug!(repo = ?self.dir, count = versions.len(), "Opened version stores");
        Ok(versions)
    }
}
