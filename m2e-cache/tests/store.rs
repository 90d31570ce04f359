use bytes::Bytes;
use m2e_cache::{CacheStore, InMemoryStore};
use std::thread::sleep;
use std::time::Duration;

#[tokio::test]
async fn test_store_set_get() {
    let store = InMemoryStore::new();
    store
        .set("k1", Bytes::from("v1"), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(store.get("k1").await.unwrap(), Some(Bytes::from("v1")));
}

#[tokio::test]
async fn test_store_miss() {
    let store = InMemoryStore::new();
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_expiry() {
    let store = InMemoryStore::new();
    store
        .set("k1", Bytes::from("v1"), Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(store.get("k1").await.unwrap(), Some(Bytes::from("v1")));
    sleep(Duration::from_millis(60));
    assert_eq!(store.get("k1").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_zero_ttl_is_not_stored() {
    let store = InMemoryStore::new();
    store
        .set("k1", Bytes::from("v1"), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(store.get("k1").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_remove() {
    let store = InMemoryStore::new();
    store
        .set("k1", Bytes::from("v1"), Duration::from_secs(60))
        .await
        .unwrap();
    store.remove("k1").await.unwrap();
    assert_eq!(store.get("k1").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_prefix_removal() {
    let store = InMemoryStore::new();
    store
        .set("users.1", Bytes::from("a"), Duration::from_secs(60))
        .await
        .unwrap();
    store
        .set("users.2", Bytes::from("b"), Duration::from_secs(60))
        .await
        .unwrap();
    store
        .set("posts.1", Bytes::from("c"), Duration::from_secs(60))
        .await
        .unwrap();

    store.remove_by_prefix("users.").await.unwrap();
    assert_eq!(store.get("users.1").await.unwrap(), None);
    assert_eq!(store.get("users.2").await.unwrap(), None);
    assert_eq!(store.get("posts.1").await.unwrap(), Some(Bytes::from("c")));
}

#[tokio::test]
async fn test_store_clear() {
    let store = InMemoryStore::new();
    store
        .set("a", Bytes::from("1"), Duration::from_secs(60))
        .await
        .unwrap();
    store
        .set("b", Bytes::from("2"), Duration::from_secs(60))
        .await
        .unwrap();
    store.clear().await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);
    assert_eq!(store.get("b").await.unwrap(), None);
}
