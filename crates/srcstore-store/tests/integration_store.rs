//! Integration tests for index listing over filesystem-backed stores.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::mpsc;

use srcstore_store::fs::{FsMultiRepoStore, FsRepoStore, FsTreeStore, IndexedUnitStore};
use srcstore_store::{
    collect_indexes, open_store, IndexCriteria, IndexDef, IndexKind, IndexLayout, IndexStatus,
    UnitId,
};

/// Layout with only raw unit outputs, so each unit carries exactly the
/// `graph` and `depresolve` artifacts.
fn unit_data_layout() -> Arc<IndexLayout> {
    Arc::new(IndexLayout {
        version: Vec::new(),
        unit: Vec::new(),
        unit_data: vec![
            IndexDef::of(IndexKind::Graph),
            IndexDef::of(IndexKind::DepResolve),
        ],
    })
}

/// Creates a unit directory under `version_dir` and writes the named data
/// artifacts with the given sizes.
fn write_unit(version_dir: &Path, unit: &UnitId, layout: &Arc<IndexLayout>, data: &[(&str, usize)]) {
    let tree = FsTreeStore::new(version_dir.to_path_buf(), layout.clone());
    let unit_dir = tree.unit_dir(unit);
    std::fs::create_dir_all(unit_dir.join("data")).unwrap();
    std::fs::create_dir_all(unit_dir.join("indexes")).unwrap();

    let store = IndexedUnitStore::new(unit_dir, layout.clone());
    for (name, size) in data {
        std::fs::write(store.unit_store().data_path(name), vec![b'x'; *size]).unwrap();
    }
}

fn identity(status: &IndexStatus) -> (Option<String>, Option<String>, Option<UnitId>, String) {
    (
        status.repo.clone(),
        status.version.clone(),
        status.unit.clone(),
        status.name.clone(),
    )
}

/// One repository, one version, one unit with a present graph and an
/// absent dependency resolution.
#[tokio::test]
async fn test_single_repo_scenario() {
    let temp_dir = tempdir().unwrap();
    let layout = unit_data_layout();
    let repo = FsRepoStore::new(temp_dir.path().join("repo"), layout.clone());
    let app = UnitId::new("app", "go");
    write_unit(&repo.version_dir("c1"), &app, &layout, &[("graph", 120)]);

    let store = open_store(repo.dir(), layout).await.unwrap();
    let mut indexes = collect_indexes(store, IndexCriteria::new(), None)
        .await
        .into_result()
        .unwrap();
    indexes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut graph = IndexStatus::new("graph", "graph");
    graph.version = Some("c1".to_string());
    graph.unit = Some(app.clone());
    graph.size = Some(120);

    let mut depresolve = IndexStatus::new("depresolve", "depresolve");
    depresolve.version = Some("c1".to_string());
    depresolve.unit = Some(app);
    depresolve.stale = true;

    assert_eq!(indexes, vec![depresolve, graph]);
}

/// A broken sibling repo is never opened by a point lookup.
#[tokio::test]
async fn test_repo_point_lookup_ignores_broken_sibling() {
    let temp_dir = tempdir().unwrap();
    let layout = unit_data_layout();
    let multi = FsMultiRepoStore::new(temp_dir.path().to_path_buf(), layout.clone());

    let x = FsRepoStore::new(multi.repo_dir("x"), layout.clone());
    write_unit(&x.version_dir("c1"), &UnitId::new("app", "go"), &layout, &[("graph", 5)]);

    // `versions` is a file, so listing y's versions fails with a non-absence error
    let y_dir = multi.repo_dir("y");
    std::fs::create_dir_all(&y_dir).unwrap();
    std::fs::write(y_dir.join("versions"), b"corrupt").unwrap();

    let store = open_store(temp_dir.path(), layout).await.unwrap();

    let report = collect_indexes(store.clone(), IndexCriteria::new().with_repo("x"), None).await;
    assert!(report.is_complete(), "unexpected error: {:?}", report.error);
    assert_eq!(report.indexes.len(), 2);
    assert!(report
        .indexes
        .iter()
        .all(|s| s.repo.as_deref() == Some("x")));

    let full = collect_indexes(store, IndexCriteria::new(), None).await;
    assert!(!full.is_complete());
    assert!(full.indexes.iter().all(|s| s.repo.as_deref() == Some("x")));
}

/// A store root without any repos yet lists nothing and succeeds.
#[tokio::test]
async fn test_empty_store_root() {
    let temp_dir = tempdir().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("repos")).unwrap();
    let store = open_store(temp_dir.path(), Arc::default()).await.unwrap();

    let report = collect_indexes(store, IndexCriteria::new(), None).await;
    assert!(report.is_complete());
    assert!(report.indexes.is_empty());
}

/// Unfiltered listing reaches every index at every level, stamped with
/// the identity of where it was found.
#[tokio::test]
async fn test_unfiltered_listing_is_complete() {
    let temp_dir = tempdir().unwrap();
    let layout: Arc<IndexLayout> = Arc::default();
    let multi = FsMultiRepoStore::new(temp_dir.path().to_path_buf(), layout.clone());

    let repo = FsRepoStore::new(multi.repo_dir("github.com/x/y"), layout.clone());
    let version_dir = repo.version_dir("c1");
    let units = [UnitId::new("app", "go"), UnitId::new("lib/core", "python")];
    for unit in &units {
        write_unit(&version_dir, unit, &layout, &[("graph", 10), ("depresolve", 4)]);
    }

    let store = open_store(temp_dir.path(), layout.clone()).await.unwrap();
    let indexes = collect_indexes(store, IndexCriteria::new(), None)
        .await
        .into_result()
        .unwrap();

    let repo_id = Some("github.com/x/y".to_string());
    let version = Some("c1".to_string());
    let mut expected = HashSet::new();
    for def in &layout.version {
        expected.insert((repo_id.clone(), version.clone(), None, def.name.clone()));
    }
    for unit in &units {
        for def in layout.unit.iter().chain(layout.unit_data.iter()) {
            expected.insert((
                repo_id.clone(),
                version.clone(),
                Some(unit.clone()),
                def.name.clone(),
            ));
        }
    }

    let found: HashSet<_> = indexes.iter().map(identity).collect();
    assert_eq!(found.len(), indexes.len(), "duplicate records");
    assert_eq!(found, expected);

    // Only raw outputs were written; derived indexes are all stale
    for status in &indexes {
        let raw = status.name == "graph" || status.name == "depresolve";
        assert_eq!(status.stale, !raw, "{}", status.name);
        assert_eq!(status.size.is_some(), raw, "{}", status.name);
    }
}

/// Type filtering applies at every level of the hierarchy.
#[tokio::test]
async fn test_type_filter_across_levels() {
    let temp_dir = tempdir().unwrap();
    let layout: Arc<IndexLayout> = Arc::default();
    let repo = FsRepoStore::new(temp_dir.path().join("repo"), layout.clone());
    write_unit(&repo.version_dir("c1"), &UnitId::new("app", "go"), &layout, &[]);

    let store = open_store(repo.dir(), layout).await.unwrap();
    let indexes = collect_indexes(store, IndexCriteria::new().with_type("def"), None)
        .await
        .into_result()
        .unwrap();

    let names: HashSet<_> = indexes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["def_query", "defs_by_file"]));

    let query = indexes.iter().find(|s| s.name == "def_query").unwrap();
    assert!(query.unit.is_none());
    let by_file = indexes.iter().find(|s| s.name == "defs_by_file").unwrap();
    assert_eq!(by_file.unit, Some(UnitId::new("app", "go")));
}

/// Version and unit point lookups narrow the walk and leave those fields
/// to the records' query scope.
#[tokio::test]
async fn test_version_and_unit_point_lookup() {
    let temp_dir = tempdir().unwrap();
    let layout = unit_data_layout();
    let repo = FsRepoStore::new(temp_dir.path().join("repo"), layout.clone());
    let app = UnitId::new("app", "go");
    write_unit(&repo.version_dir("c1"), &app, &layout, &[("graph", 1)]);
    write_unit(&repo.version_dir("c2"), &app, &layout, &[("graph", 2)]);
    write_unit(&repo.version_dir("c2"), &UnitId::new("other", "go"), &layout, &[]);

    let store = open_store(repo.dir(), layout).await.unwrap();
    let criteria = IndexCriteria::new()
        .with_version("c2")
        .with_unit(app.clone())
        .with_name("graph");
    let indexes = collect_indexes(store, criteria, None)
        .await
        .into_result()
        .unwrap();

    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].version.as_deref(), Some("c2"));
    assert_eq!(indexes[0].unit, Some(app));
    assert_eq!(indexes[0].size, Some(2));
}

/// Querying a unit directory directly yields records without identity.
#[tokio::test]
async fn test_unit_scope_has_no_identity() {
    let temp_dir = tempdir().unwrap();
    let layout = unit_data_layout();
    let version_dir = temp_dir.path().join("repo").join("versions").join("c1");
    let app = UnitId::new("app", "go");
    write_unit(&version_dir, &app, &layout, &[("graph", 3)]);

    let unit_dir = FsTreeStore::new(version_dir, layout.clone()).unit_dir(&app);
    let store = open_store(&unit_dir, layout).await.unwrap();
    let indexes = collect_indexes(store, IndexCriteria::new(), None)
        .await
        .into_result()
        .unwrap();

    assert_eq!(indexes.len(), 2);
    assert!(indexes
        .iter()
        .all(|s| s.repo.is_none() && s.version.is_none() && s.unit.is_none()));
}

/// Repeated queries over unchanged storage give the same set, and the
/// live stream sees the same records as the report.
#[tokio::test]
async fn test_repeated_query_and_live_stream() {
    let temp_dir = tempdir().unwrap();
    let layout: Arc<IndexLayout> = Arc::default();
    let multi = FsMultiRepoStore::new(temp_dir.path().to_path_buf(), layout.clone());
    for repo_id in ["a", "b"] {
        let repo = FsRepoStore::new(multi.repo_dir(repo_id), layout.clone());
        write_unit(&repo.version_dir("c1"), &UnitId::new("app", "go"), &layout, &[("graph", 9)]);
    }
    let store = open_store(temp_dir.path(), layout).await.unwrap();

    let (live_tx, mut live_rx) = mpsc::channel(4);
    let drain = tokio::spawn(async move {
        let mut seen = HashSet::new();
        while let Some(status) = live_rx.recv().await {
            seen.insert(status);
        }
        seen
    });

    let first = collect_indexes(store.clone(), IndexCriteria::new(), Some(live_tx))
        .await
        .into_result()
        .unwrap();
    let second = collect_indexes(store, IndexCriteria::new(), None)
        .await
        .into_result()
        .unwrap();
    let streamed = drain.await.unwrap();

    let first: HashSet<_> = first.into_iter().collect();
    let second: HashSet<_> = second.into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first, streamed);
}
