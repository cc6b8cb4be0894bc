//! Index status queries against the configured store.

use crate::{CoreError, StoreConfig};
use serde::Serialize;
use srcstore_store::{
    collect_indexes, open_store, IndexCriteria, IndexLayout, IndexReport, IndexStatus, Store,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Counts of listed indexes by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub total: usize,
    pub fresh: usize,
    pub stale: usize,
    pub errors: usize,
    /// Combined size of all present artifacts
    pub bytes: u64,
}

impl IndexSummary {
    pub fn from_statuses(statuses: &[IndexStatus]) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            if status.is_indeterminate() {
                summary.errors += 1;
            } else if status.stale {
                summary.stale += 1;
            } else {
                summary.fresh += 1;
                summary.bytes += status.size.unwrap_or(0);
            }
        }
        summary
    }
}

/// Runs index listings using a loaded configuration.
pub struct IndexQuery {
    config: StoreConfig,
    layout: Arc<IndexLayout>,
}

impl IndexQuery {
    pub fn new(config: StoreConfig) -> Self {
        let layout = Arc::new(config.layout.clone());
        Self { config, layout }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens the store at `dir`, or the configured store root.
    pub async fn open(&self, dir: Option<&Path>) -> Result<Arc<dyn Store>, CoreError> {
        let dir = dir.unwrap_or(self.config.store_dir.as_path());
        Ok(open_store(dir, self.layout.clone()).await?)
    }

    /// Lists indexes in `store`, streaming each to `live` if given.
    pub async fn list(
        &self,
        store: Arc<dyn Store>,
        criteria: IndexCriteria,
        live: Option<mpsc::Sender<IndexStatus>>,
    ) -> IndexReport {
        let report = collect_indexes(store, criteria, live).await;
        let summary = IndexSummary::from_statuses(&report.indexes);

        info!(
            total = summary.total,
            stale = summary.stale,
            errors = summary.errors,
            complete = report.is_complete(),
            "Listed indexes"
        );

        report
    }
}
