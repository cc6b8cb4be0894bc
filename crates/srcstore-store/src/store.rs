//! Store capabilities.
//!
//! A store at any level of the hierarchy implements [`Store`] and exposes
//! the subset of capabilities it supports through the `as_*` accessors.
//! A version store, for example, holds its own indexes and can also open
//! per-unit child stores, while a multi-repo store can only open repos.

use crate::index::Index;
use crate::unit::UnitId;
use crate::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Child stores keyed by their identifier at one level.
pub type Children<K> = HashMap<K, Box<dyn Store>>;

/// A store object at some level of the repo/version/unit hierarchy.
pub trait Store: Send + Sync {
    /// Named indexes held directly by this store.
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        None
    }

    /// A lower-level store this one wraps at the same identity level.
    fn lower(&self) -> Option<&dyn Store> {
        None
    }

    fn as_repo_opener(&self) -> Option<&dyn RepoOpener> {
        None
    }

    fn as_version_opener(&self) -> Option<&dyn VersionOpener> {
        None
    }

    fn as_unit_opener(&self) -> Option<&dyn UnitOpener> {
        None
    }
}

/// A store that holds named indexes.
#[async_trait]
pub trait Indexed: Send + Sync {
    /// All indexes this store declares, keyed by name.
    fn indexes(&self) -> HashMap<String, Arc<dyn Index>>;

    /// Byte size of the artifact backing the named index.
    ///
    /// Returns an error for which [`StoreError::is_not_found`] holds when
    /// the artifact is absent.
    async fn stat_index(&self, name: &str) -> Result<u64, StoreError>;
}

/// Opens per-repository stores.
#[async_trait]
pub trait RepoOpener: Send + Sync {
    /// Opens one repo store without checking that it exists.
    fn open_repo(&self, repo: &str) -> Box<dyn Store>;

    /// Opens every repo store. Fails with a not-found error if the repo
    /// collection itself is absent.
    async fn open_all_repos(&self) -> Result<Children<String>, StoreError>;
}

/// Opens per-version (commit or tree) stores.
#[async_trait]
pub trait VersionOpener: Send + Sync {
    fn open_version(&self, version: &str) -> Box<dyn Store>;

    async fn open_all_versions(&self) -> Result<Children<String>, StoreError>;
}

/// Opens per-source-unit stores.
#[async_trait]
pub trait UnitOpener: Send + Sync {
    fn open_unit(&self, unit: &UnitId) -> Box<dyn Store>;

    async fn open_all_units(&self) -> Result<Children<UnitId>, StoreError>;
}
