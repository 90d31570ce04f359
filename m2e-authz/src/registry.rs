//! Policy registry - resolves authorization decisions with caching.
//!
//! The registry maps resource identifiers to their [`ResourcePolicy`] and
//! wraps every check in the decision cache. Only `authorize` consults
//! policies; the write path calls [`invalidate`](PolicyRegistry::invalidate)
//! after mutations so stale decisions never outlive the data they were
//! made about.

use crate::cache::PolicyCache;
use crate::config::AuthzConfig;
use crate::error::AuthzError;
use crate::policy::{CacheDuration, ResourcePolicy};
use crate::subject::Subject;
use m2e_cache::CacheStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The target of an ability check: a resource class or one of its models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    resource: String,
    model_key: Option<String>,
}

impl Target {
    /// Class-level target ("may the subject list posts at all?").
    pub fn class(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            model_key: None,
        }
    }

    /// Instance-level target ("may the subject update post 42?").
    pub fn instance(resource: impl Into<String>, model_key: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            model_key: Some(model_key.into()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn model_key(&self) -> Option<&str> {
        self.model_key.as_deref()
    }
}

/// Clonable handle resolving authorization decisions through the cache.
///
/// # Usage pattern
///
/// ```ignore
/// use m2e_authz::{AuthzConfig, PolicyRegistry, Subject, Target};
/// use m2e_cache::InMemoryStore;
/// use std::sync::Arc;
///
/// let registry = PolicyRegistry::new(AuthzConfig::new(), Arc::new(InMemoryStore::new()))
///     .with_policy("posts", PostPolicy::new(pool.clone()));
///
/// // Read path
/// let subject = Subject::user(user.sub());
/// if !registry.authorize(&subject, "show", &Target::instance("posts", &id)).await? {
///     return Err(HttpError::Forbidden("".into()));
/// }
///
/// // Write path: purge decisions the mutation may have changed
/// registry.invalidate("posts", Some(&id)).await;
/// ```
///
/// # Resolution order
///
/// Per check: global flag → the policy's own [`CacheDuration`] → cache
/// lookup → real evaluation → cache store. A policy error aborts before
/// the store step, so failures are never cached.
#[derive(Clone)]
pub struct PolicyRegistry {
    policies: Arc<HashMap<String, Arc<dyn ResourcePolicy>>>,
    cache: PolicyCache,
    config: AuthzConfig,
}

impl PolicyRegistry {
    /// Create an empty registry over the given store.
    ///
    /// The store is shared, long-lived infrastructure; the registry itself
    /// is a cheap handle constructed at the composition root.
    pub fn new(config: AuthzConfig, store: Arc<dyn CacheStore>) -> Self {
        Self {
            policies: Arc::new(HashMap::new()),
            cache: PolicyCache::new(store),
            config,
        }
    }

    /// Register the policy guarding `resource`. Later registrations win.
    pub fn with_policy(mut self, resource: impl Into<String>, policy: impl ResourcePolicy) -> Self {
        Arc::make_mut(&mut self.policies).insert(resource.into(), Arc::new(policy));
        self
    }

    // ── Authorize ──────────────────────────────────────────────────────

    /// Decide whether `subject` may perform `ability` on `target`.
    ///
    /// Returns `Ok(true)` / `Ok(false)` for a decision; a policy evaluation
    /// failure propagates unchanged and is never cached. A resource with no
    /// registered policy is not guarded and allows every ability.
    pub async fn authorize(
        &self,
        subject: &Subject,
        ability: &str,
        target: &Target,
    ) -> Result<bool, AuthzError> {
        let resource = target.resource();
        let Some(policy) = self.policies.get(resource) else {
            tracing::trace!(resource, ability, "no policy registered, allowing");
            return Ok(true);
        };

        let ttl = if self.config.enabled {
            self.cache_ttl(policy.as_ref(), ability)
        } else {
            None
        };

        let key = ttl
            .is_some()
            .then(|| PolicyCache::key_for(resource, ability, target.model_key(), subject));

        if let Some(key) = key.as_deref() {
            if let Some(allowed) = self.cache.get(key).await {
                tracing::trace!(resource, ability, subject = %subject, allowed, "cache hit");
                return Ok(allowed);
            }
        }

        let allowed = policy
            .evaluate(subject, ability, target.model_key())
            .await?;
        tracing::trace!(resource, ability, subject = %subject, allowed, "policy evaluated");

        if let (Some(key), Some(ttl)) = (key, ttl) {
            self.cache.put(&key, allowed, ttl).await;
        }

        Ok(allowed)
    }

    /// Like [`authorize`](Self::authorize), but maps a denial to
    /// [`AuthzError::Forbidden`] so callers get one uniform outcome.
    pub async fn authorize_or_fail(
        &self,
        subject: &Subject,
        ability: &str,
        target: &Target,
    ) -> Result<(), AuthzError> {
        if self.authorize(subject, ability, target).await? {
            Ok(())
        } else {
            Err(AuthzError::Forbidden {
                resource: target.resource().to_string(),
                ability: ability.to_string(),
            })
        }
    }

    /// The TTL to cache with, or `None` when this check must not be cached.
    fn cache_ttl(&self, policy: &dyn ResourcePolicy, ability: &str) -> Option<Duration> {
        match policy.cache_duration(ability) {
            CacheDuration::Default => Some(self.config.default_ttl()),
            CacheDuration::For(ttl) if ttl.is_zero() => {
                tracing::warn!(ability, "policy declared a zero cache duration, not caching");
                None
            }
            CacheDuration::For(ttl) => Some(ttl),
            CacheDuration::Disabled => None,
        }
    }

    // ── Cache management ───────────────────────────────────────────────

    /// Purge cached decisions after a mutation.
    ///
    /// With a model key, removes that model's entries together with the
    /// resource's class-level entries (a write can change answers like
    /// "list"). Without one, removes everything cached for the resource.
    pub async fn invalidate(&self, resource: &str, model_key: Option<&str>) {
        match model_key {
            Some(key) => {
                self.cache
                    .forget_prefix(&PolicyCache::model_prefix(resource, key))
                    .await;
                self.cache
                    .forget_prefix(&PolicyCache::class_prefix(resource))
                    .await;
            }
            None => {
                self.cache
                    .forget_prefix(&PolicyCache::resource_prefix(resource))
                    .await;
            }
        }
    }

    /// Clear every cached decision.
    pub async fn flush_cache(&self) {
        self.cache.flush().await;
    }
}
