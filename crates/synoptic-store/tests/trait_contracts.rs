//! Trait contract tests for ArtifactStore.
//!
//! Every conforming implementation must pass these; they run against both
//! the in-memory fake and the JSON-file backend.

use synoptic_store::fakes::MemoryArtifactStore;
use synoptic_store::{ArtifactStore, BriefingId, JsonFileArtifactStore, StorageError, HISTORY_CAP};

async fn json_store(dir: &tempfile::TempDir) -> JsonFileArtifactStore {
    JsonFileArtifactStore::open(dir.path().join("briefings.json"))
        .await
        .unwrap()
}

async fn assert_newest_first(store: &dyn ArtifactStore) {
    store.save("first query", "one").await.unwrap();
    store.save("second query", "two").await.unwrap();

    let history = store.load().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].query, "second query");
    assert_eq!(history[1].query, "first query");
}

async fn assert_capped(store: &dyn ArtifactStore) {
    for i in 0..(HISTORY_CAP + 3) {
        store.save(&format!("query {i}"), "body").await.unwrap();
    }
    let history = store.load().await.unwrap();
    assert_eq!(history.len(), HISTORY_CAP);
    assert_eq!(history[0].query, format!("query {}", HISTORY_CAP + 2));
}

async fn assert_get_and_delete(store: &dyn ArtifactStore) {
    let saved = store.save("weather in Delhi", "body").await.unwrap();
    assert_eq!(store.get(&saved.id).await.unwrap(), saved);

    store.delete(&saved.id).await.unwrap();
    let err = store.get(&saved.id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    // Deleting again is a no-op.
    store.delete(&saved.id).await.unwrap();
}

async fn assert_search(store: &dyn ArtifactStore) {
    store.save("Tech news in Pune", "a").await.unwrap();
    store.save("sports for Chennai", "b").await.unwrap();

    let hits = store.search("pune").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Tech news in Pune");
}

#[tokio::test]
async fn memory_store_is_newest_first() {
    assert_newest_first(&MemoryArtifactStore::new()).await;
}

#[tokio::test]
async fn memory_store_is_capped() {
    assert_capped(&MemoryArtifactStore::new()).await;
}

#[tokio::test]
async fn memory_store_get_and_delete() {
    assert_get_and_delete(&MemoryArtifactStore::new()).await;
}

#[tokio::test]
async fn memory_store_search() {
    assert_search(&MemoryArtifactStore::new()).await;
}

#[tokio::test]
async fn json_store_is_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    assert_newest_first(&json_store(&dir).await).await;
}

#[tokio::test]
async fn json_store_is_capped() {
    let dir = tempfile::tempdir().unwrap();
    assert_capped(&json_store(&dir).await).await;
}

#[tokio::test]
async fn json_store_get_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    assert_get_and_delete(&json_store(&dir).await).await;
}

#[tokio::test]
async fn json_store_search() {
    let dir = tempfile::tempdir().unwrap();
    assert_search(&json_store(&dir).await).await;
}

#[tokio::test]
async fn json_store_reloads_history_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let store = json_store(&dir).await;
        store.save("morning briefing", "content").await.unwrap()
    };

    let reopened = json_store(&dir).await;
    let history = reopened.load().await.unwrap();
    assert_eq!(history, vec![saved]);
}

#[tokio::test]
async fn json_store_treats_corrupt_file_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("briefings.json");
    std::fs::write(&path, b"{not json").unwrap();

    let store = JsonFileArtifactStore::open(&path).await.unwrap();
    assert!(store.load().await.unwrap().is_empty());

    store.save("fresh", "body").await.unwrap();
    let reopened = JsonFileArtifactStore::open(&path).await.unwrap();
    assert_eq!(reopened.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn json_store_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("briefings.json");

    let store = JsonFileArtifactStore::open(&path).await.unwrap();
    store.save("q", "c").await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let store = MemoryArtifactStore::new();
    let err = store.get(&BriefingId::from("missing")).await.unwrap_err();
    assert!(err.to_string().contains("missing"));
}

/// Open a store under `dir/sub`, then make `sub` a plain file so writes fail.
async fn unwritable_json_store(dir: &tempfile::TempDir) -> JsonFileArtifactStore {
    let sub = dir.path().join("sub");
    let store = JsonFileArtifactStore::open(sub.join("briefings.json"))
        .await
        .unwrap();
    std::fs::write(&sub, b"not a directory").unwrap();
    store
}

#[tokio::test]
async fn json_store_failed_save_leaves_history_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = unwritable_json_store(&dir).await;

    assert!(store.save("briefing for Goa", "body").await.is_err());
    assert!(store.load().await.unwrap().is_empty());
    assert!(store.search("goa").await.unwrap().is_empty());
}

#[tokio::test]
async fn json_store_failed_delete_keeps_entry() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    let store = JsonFileArtifactStore::open(sub.join("briefings.json"))
        .await
        .unwrap();
    let saved = store.save("briefing for Goa", "body").await.unwrap();

    std::fs::remove_dir_all(&sub).unwrap();
    std::fs::write(&sub, b"not a directory").unwrap();

    assert!(store.delete(&saved.id).await.is_err());
    assert_eq!(store.get(&saved.id).await.unwrap(), saved);
}
