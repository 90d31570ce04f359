use bytes::Bytes;
use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Errors reported by cache store backends.
///
/// The store is shared infrastructure: callers that must not fail when it
/// degrades (decision caching is one) are expected to catch these and carry
/// on without the cache.
#[derive(Debug)]
pub enum CacheError {
    /// The backend could not be reached.
    Unavailable(String),
    /// The backend answered with an error.
    Backend(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Unavailable(msg) => write!(f, "cache store unreachable: {}", msg),
            CacheError::Backend(msg) => write!(f, "cache store error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

/// Pluggable cache backend trait.
///
/// Implement this to swap the default in-memory store for Redis, Memcached,
/// etc. Entries carry a per-entry time-to-live enforced by the store: an
/// expired entry reads as absent. A `ttl` of zero means "do not store".
pub trait CacheStore: Send + Sync + 'static {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Bytes>, CacheError>> + Send + 'a>>;
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Bytes,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;
    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;
    fn remove_by_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;
    fn clear(&self) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + '_>>;
}

/// Default in-memory cache store backed by `DashMap`.
///
/// Each entry stores `(value, inserted_at, ttl)` and is lazily evicted on
/// access. Single-key operations are atomic; that is all callers rely on.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, (Bytes, Instant, Duration)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for InMemoryStore {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Bytes>, CacheError>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(entry) = self.inner.get(key) {
                let (val, inserted, ttl) = entry.value();
                if inserted.elapsed() < *ttl {
                    return Ok(Some(val.clone()));
                }
                // Expired — drop the read guard before removing
                drop(entry);
                self.inner.remove(key);
            }
            Ok(None)
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Bytes,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            if ttl.is_zero() {
                return Ok(());
            }
            self.inner
                .insert(key.to_string(), (value, Instant::now(), ttl));
            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            self.inner.remove(key);
            Ok(())
        })
    }

    fn remove_by_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            self.inner.retain(|k, _| !k.starts_with(prefix));
            Ok(())
        })
    }

    fn clear(&self) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + '_>> {
        Box::pin(async move {
            self.inner.clear();
            Ok(())
        })
    }
}
