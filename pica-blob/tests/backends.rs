use bytes::Bytes;
use pica_blob::{
    BlobAdapter, BlobBackend, BlobConfig, BlobError, BlobKey, BlobStore, FileSystemBlobStore,
    MemoryBlobStore,
};
use pica_core::{ArtifactId, ClientId};

fn key(client: &str, filename: &str) -> BlobKey {
    BlobKey::new(ClientId::parse(client).unwrap(), ArtifactId::new(), filename)
}

/// Shared behavior every backend must show.
async fn exercise_store(store: &dyn BlobStore) {
    let k = key("c1", "cat.png");

    let put = store.put(&k, Some("image/png"), Bytes::from_static(b"pixels")).await.unwrap();
    assert_eq!(put.size_bytes, 6);
    assert_eq!(store.get(&k).await.unwrap(), Bytes::from_static(b"pixels"));

    store.delete(&k).await.unwrap();
    assert!(matches!(store.get(&k).await, Err(BlobError::NotFound { .. })));
    assert!(matches!(store.delete(&k).await, Err(BlobError::NotFound { .. })));
}

#[tokio::test]
async fn memory_store_conforms() {
    exercise_store(&MemoryBlobStore::new()).await;
}

#[tokio::test]
async fn filesystem_store_conforms() {
    let dir = tempfile::tempdir().unwrap();
    exercise_store(&FileSystemBlobStore::new(dir.path())).await;
}

#[tokio::test]
async fn filesystem_put_creates_container_hierarchy() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSystemBlobStore::new(dir.path());
    let k = key("c1", "cat.png");

    store.put(&k, None, Bytes::from_static(b"x")).await.unwrap();

    let file = dir.path().join(k.path());
    assert!(file.is_file());
    assert_eq!(std::fs::read(file).unwrap(), b"x");
}

#[tokio::test]
async fn filesystem_delete_removes_empty_container_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSystemBlobStore::new(dir.path());
    let first = key("c1", "a.png");
    let second = key("c1", "b.png");

    store.put(&first, None, Bytes::from_static(b"a")).await.unwrap();
    store.put(&second, None, Bytes::from_static(b"b")).await.unwrap();
    store.delete(&first).await.unwrap();

    assert!(!dir.path().join(first.container()).exists());
    assert!(dir.path().join("c1").is_dir());
    assert!(dir.path().join(second.path()).is_file());
}

#[tokio::test]
async fn adapter_delete_tolerates_missing_blob_on_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = BlobAdapter::new(FileSystemBlobStore::new(dir.path()), BlobConfig::default());

    blobs.delete(&key("c1", "never-written.png")).await.unwrap();
}

#[tokio::test]
async fn filesystem_backend_connect_creates_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("files");

    let store = BlobBackend::FileSystem { root: root.clone() }.connect().await.unwrap();

    assert!(root.is_dir());
    assert_eq!(store.name(), "fs");
}
