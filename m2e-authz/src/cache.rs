//! Keyed cache for policy decisions.
//!
//! A thin, clonable layer over any [`CacheStore`]: deterministic key
//! construction plus get/put/forget. Store faults never reach the
//! authorization path — a failed read is a miss, a failed write is dropped,
//! both logged at `warn` level.

use crate::subject::Subject;
use bytes::Bytes;
use m2e_cache::CacheStore;
use std::sync::Arc;
use std::time::Duration;

/// Namespace under which every decision key is written, so `flush` can
/// clear this cache without touching unrelated tenants of a shared store.
const KEY_NAMESPACE: &str = "policies";

/// Segment used in place of a model key for class-level abilities.
const CLASS_SEGMENT: &str = "_";

/// Deterministic key construction and store access for cached decisions.
#[derive(Clone)]
pub struct PolicyCache {
    store: Arc<dyn CacheStore>,
}

impl PolicyCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Build the key for one `(subject, ability, target)` decision.
    ///
    /// Layout: `policies.{resource}.{model_key | "_"}.{ability}.{subject}`.
    /// The model segment precedes the ability so that one mutated model can
    /// be purged with a single prefix removal. Dots inside caller-supplied
    /// segments are replaced, so no input can forge a foreign prefix.
    pub fn key_for(
        resource: &str,
        ability: &str,
        model_key: Option<&str>,
        subject: &Subject,
    ) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            KEY_NAMESPACE,
            segment(resource),
            model_key.map_or_else(|| CLASS_SEGMENT.to_string(), segment),
            segment(ability),
            segment(subject.cache_segment()),
        )
    }

    /// Prefix covering every cached decision for a resource.
    pub fn resource_prefix(resource: &str) -> String {
        format!("{}.{}.", KEY_NAMESPACE, segment(resource))
    }

    /// Prefix covering every cached decision for one model of a resource.
    pub fn model_prefix(resource: &str, model_key: &str) -> String {
        format!(
            "{}.{}.{}.",
            KEY_NAMESPACE,
            segment(resource),
            segment(model_key)
        )
    }

    /// Prefix covering a resource's class-level decisions.
    pub fn class_prefix(resource: &str) -> String {
        format!(
            "{}.{}.{}.",
            KEY_NAMESPACE,
            segment(resource),
            CLASS_SEGMENT
        )
    }

    /// Read a cached decision. Absent, expired, undecodable and failed
    /// reads all come back as `None`.
    pub async fn get(&self, key: &str) -> Option<bool> {
        match self.store.get(key).await {
            Ok(Some(value)) => decode(&value).or_else(|| {
                tracing::warn!(key, "unrecognized cached decision, treating as miss");
                None
            }),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "policy cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a decision for `ttl`. A zero `ttl` stores nothing; a store
    /// fault drops the write.
    pub async fn put(&self, key: &str, decision: bool, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let value = Bytes::from_static(if decision { b"1" } else { b"0" });
        if let Err(err) = self.store.set(key, value, ttl).await {
            tracing::warn!(key, error = %err, "policy cache write failed, decision not cached");
        }
    }

    /// Remove one cached decision.
    pub async fn forget(&self, key: &str) {
        if let Err(err) = self.store.remove(key).await {
            tracing::warn!(key, error = %err, "policy cache invalidation failed");
        }
    }

    /// Remove every cached decision under `prefix`.
    pub async fn forget_prefix(&self, prefix: &str) {
        if let Err(err) = self.store.remove_by_prefix(prefix).await {
            tracing::warn!(prefix, error = %err, "policy cache invalidation failed");
        }
    }

    /// Remove every decision this cache has written.
    pub async fn flush(&self) {
        let prefix = format!("{}.", KEY_NAMESPACE);
        if let Err(err) = self.store.remove_by_prefix(&prefix).await {
            tracing::warn!(error = %err, "policy cache flush failed");
        }
    }
}

fn segment(raw: &str) -> String {
    raw.replace('.', "_")
}

fn decode(value: &Bytes) -> Option<bool> {
    match value.as_ref() {
        b"1" => Some(true),
        b"0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = PolicyCache::key_for("posts", "show", Some("42"), &Subject::user("7"));
        assert_eq!(key, "policies.posts.42.show.7");

        let key = PolicyCache::key_for("posts", "list", None, &Subject::Anonymous);
        assert_eq!(key, "policies.posts._.list.guest");
    }

    #[test]
    fn test_key_segments_are_sanitized() {
        let key = PolicyCache::key_for("po.sts", "show", Some("4.2"), &Subject::user("a.b"));
        assert_eq!(key, "policies.po_sts.4_2.show.a_b");
        assert!(!key.starts_with(&PolicyCache::resource_prefix("po")));
    }

    #[test]
    fn test_prefixes_cover_keys() {
        let key = PolicyCache::key_for("posts", "show", Some("42"), &Subject::user("7"));
        assert!(key.starts_with(&PolicyCache::resource_prefix("posts")));
        assert!(key.starts_with(&PolicyCache::model_prefix("posts", "42")));
        assert!(!key.starts_with(&PolicyCache::class_prefix("posts")));

        let class_key = PolicyCache::key_for("posts", "list", None, &Subject::user("7"));
        assert!(class_key.starts_with(&PolicyCache::class_prefix("posts")));
    }
}
