//! Discovery over `object_store` backends.

use crate::common::paths;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use pv_discovery::query::MembershipQuery;
use pv_discovery::{
    AutoGrammar, ConstantQuery, DiscoveryConfig, ObjectStoreStorage, Partition, PvError, Storage,
    StorageOptions, discover_partitions, storage_from_url,
};
use std::fs;
use std::sync::Arc;

const TREE: [&str; 3] = [
    "table/col1=4/col2=5/f1.json",
    "table/col1=4/col2=6/f2.json",
    "table/col1=9/col2=6/f3.json",
];

#[tokio::test]
async fn test_discover_in_memory_store() {
    let store = InMemory::new();
    for path in TREE {
        store
            .put(&ObjectPath::from(path), PutPayload::from_static(b"{}"))
            .await
            .unwrap();
    }
    let storage = ObjectStoreStorage::new(Arc::new(store), "memory");
    let grammar = AutoGrammar::from_description("col1/col2", None).unwrap();
    let query = MembershipQuery::eq("col1", "4");

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("table"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["table/col1=4/col2=5/f1.json", "table/col1=4/col2=6/f2.json"]
    );

    let contents = storage.open(&partitions[0].path).await.unwrap();
    assert_eq!(contents.as_ref(), b"{}");
}

#[tokio::test]
async fn test_discover_local_directory() {
    let dir = tempfile::tempdir().unwrap();
    for path in TREE {
        let file = dir.path().join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"{}").unwrap();
    }

    let url = format!("file://{}/table", dir.path().display());
    let (storage, root) = storage_from_url(&url, &StorageOptions::new()).unwrap();
    assert_eq!(root, "");

    let grammar = AutoGrammar::from_description("col1/col2", None).unwrap();
    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root(root),
        storage.as_ref(),
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec![
            "col1=4/col2=5/f1.json",
            "col1=4/col2=6/f2.json",
            "col1=9/col2=6/f3.json",
        ]
    );
    assert_eq!(partitions[2].column("col1"), Some("9"));
}

#[tokio::test]
async fn test_missing_local_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("col1=4/col2=1/f");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, b"{}").unwrap();

    let url = format!("file://{}", dir.path().display());
    let (storage, root) = storage_from_url(&url, &StorageOptions::new()).unwrap();
    let grammar = AutoGrammar::from_description("col1=[4,7]/col2", None).unwrap();

    let result = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root(root),
        storage.as_ref(),
        &DiscoveryConfig::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(PvError::StorageNotFound(path)) if path == "col1=7/"
    ));
}
