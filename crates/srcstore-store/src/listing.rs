//! Index discovery across the store hierarchy.
//!
//! [`list_indexes`] walks a store and everything it can open, emitting one
//! [`IndexStatus`] per matching index onto a channel. [`collect_indexes`]
//! runs that walk on a spawned task, gathers the records and optionally
//! streams each one to a live consumer as soon as it is found.
//!
//! Emission order across sibling stores follows whatever order the opener
//! yields, so callers should treat results as a set.

use crate::status::{IndexCriteria, IndexStatus};
use crate::store::{Children, Indexed, Store};
use crate::StoreError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Stamps hierarchy identity (repo, version, unit) onto a record before
/// it is emitted. Each level wraps its parent's annotation with its own.
pub type Annotate = Arc<dyn Fn(&mut IndexStatus) + Send + Sync>;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capacity of the channel between the listing task and the collector.
const LISTING_CHANNEL_CAPACITY: usize = 1;

/// Annotation that leaves records untouched.
pub fn unannotated() -> Annotate {
    Arc::new(|_: &mut IndexStatus| {})
}

fn stamp<F>(parent: &Annotate, f: F) -> Annotate
where
    F: Fn(&mut IndexStatus) + Send + Sync + 'static,
{
    let parent = parent.clone();
    Arc::new(move |status: &mut IndexStatus| {
        f(status);
        parent(status);
    })
}

/// Lists indexes in `store` and its lower-level stores, sending each
/// matching status to `tx`.
///
/// Failing to open a child-store collection aborts the whole walk, except
/// when the collection is simply absent. Records already sent stay sent.
pub fn list_indexes<'a>(
    store: &'a dyn Store,
    criteria: &'a IndexCriteria,
    tx: &'a mpsc::Sender<IndexStatus>,
    annotate: Annotate,
) -> BoxFuture<'a, Result<(), StoreError>> {
    Box::pin(async move {
        if let Some(indexed) = store.as_indexed() {
            list_own_indexes(indexed, criteria, tx, &annotate).await?;
        }

        if let Some(lower) = store.lower() {
            list_indexes(lower, criteria, tx, annotate.clone()).await?;
        }

        if let Some(opener) = store.as_repo_opener() {
            let repos = match &criteria.repo {
                Some(repo) => single(repo.clone(), opener.open_repo(repo)),
                None => absent_as_empty(opener.open_all_repos().await)?,
            };
            for (repo, repo_store) in repos {
                debug!(repo = %repo, "Listing repo");
                let annotate = stamp(&annotate, move |status| status.repo = Some(repo.clone()));
                list_indexes(repo_store.as_ref(), criteria, tx, annotate).await?;
            }
        }

        if let Some(opener) = store.as_version_opener() {
            let versions = match &criteria.version {
                Some(version) => single(version.clone(), opener.open_version(version)),
                None => absent_as_empty(opener.open_all_versions().await)?,
            };
            for (version, version_store) in versions {
                debug!(version = %version, "Listing version");
                let annotate = stamp(&annotate, move |status| {
                    status.version = Some(version.clone())
                });
                list_indexes(version_store.as_ref(), criteria, tx, annotate).await?;
            }
        }

        if let Some(opener) = store.as_unit_opener() {
            let units = match &criteria.unit {
                Some(unit) => single(unit.clone(), opener.open_unit(unit)),
                None => absent_as_empty(opener.open_all_units().await)?,
            };
            for (unit, unit_store) in units {
                debug!(unit = %unit, "Listing unit");
                let annotate = stamp(&annotate, move |status| status.unit = Some(unit.clone()));
                list_indexes(unit_store.as_ref(), criteria, tx, annotate).await?;
            }
        }

        Ok(())
    })
}

async fn list_own_indexes(
    indexed: &dyn Indexed,
    criteria: &IndexCriteria,
    tx: &mpsc::Sender<IndexStatus>,
    annotate: &Annotate,
) -> Result<(), StoreError> {
    for (name, index) in indexed.indexes() {
        if !criteria.matches_name(&name) || !criteria.matches_type(index.type_name()) {
            continue;
        }

        let mut status = IndexStatus::new(name, index.type_name());
        match indexed.stat_index(&status.name).await {
            Ok(size) => status.size = Some(size),
            Err(e) if e.is_not_found() => status.stale = true,
            Err(e) => {
                warn!(index = %status.name, error = %e, "Failed to stat index");
                status.error = Some(e.to_string());
            }
        }

        if !criteria.matches_stale(status.stale) {
            continue;
        }

        annotate(&mut status);
        tx.send(status)
            .await
            .map_err(|_| StoreError::Aborted("index receiver closed".to_string()))?;
    }

    Ok(())
}

fn single<K: std::hash::Hash + Eq>(key: K, store: Box<dyn Store>) -> Children<K> {
    HashMap::from([(key, store)])
}

fn absent_as_empty<K>(opened: Result<Children<K>, StoreError>) -> Result<Children<K>, StoreError> {
    match opened {
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "Store collection absent, treating as empty");
            Ok(HashMap::new())
        }
        other => other,
    }
}

/// Result of a complete listing.
///
/// When `error` is set the listing stopped early and `indexes` holds only
/// what was found before the failure.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub indexes: Vec<IndexStatus>,
    pub error: Option<StoreError>,
}

impl IndexReport {
    /// Whether every reachable index was visited.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discards partial results on failure.
    pub fn into_result(self) -> Result<Vec<IndexStatus>, StoreError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.indexes),
        }
    }
}

/// Lists indexes in `store` and gathers them into a report.
///
/// If `live` is given, each record is forwarded to it as soon as it is
/// found; the caller must keep draining it or the listing stalls. A live
/// receiver that is dropped early only stops the forwarding.
pub async fn collect_indexes(
    store: Arc<dyn Store>,
    criteria: IndexCriteria,
    live: Option<mpsc::Sender<IndexStatus>>,
) -> IndexReport {
    let (tx, mut rx) = mpsc::channel(LISTING_CHANNEL_CAPACITY);

    let producer = tokio::spawn(async move {
        list_indexes(store.as_ref(), &criteria, &tx, unannotated()).await
    });

    let mut live = live;
    let mut indexes = Vec::new();
    while let Some(status) = rx.recv().await {
        let forwarded = match &live {
            Some(sender) => sender.send(status.clone()).await.is_ok(),
            None => true,
        };
        if !forwarded {
            debug!("Live index receiver dropped, continuing without it");
            live = None;
        }
        indexes.push(status);
    }

    let error = match producer.await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(e) => Some(StoreError::Aborted(e.to_string())),
    };

    if let Some(e) = &error {
        warn!(error = %e, found = indexes.len(), "Index listing incomplete");
    } else {
        debug!(found = indexes.len(), "Index listing complete");
    }

    IndexReport { indexes, error }
}
