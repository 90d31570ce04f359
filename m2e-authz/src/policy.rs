//! Policy trait and implementations.
//!
//! [`ResourcePolicy`] is the core abstraction — implement it to supply the
//! authorization rules for one resource. Policies are resolved through an
//! explicit registration ([`PolicyRegistry`](crate::PolicyRegistry)), never
//! discovered at runtime.

use crate::error::AuthzError;
use crate::subject::Subject;
use dashmap::DashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a policy's decisions may be cached.
///
/// Returned by [`ResourcePolicy::cache_duration`] per ability, so a policy
/// can cache cheap-but-hot checks while keeping volatile ones fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDuration {
    /// Cache with the framework-wide default TTL.
    Default,
    /// Cache for exactly this long.
    For(Duration),
    /// Never cache decisions for this ability.
    Disabled,
}

/// Authorization rules for one resource.
///
/// `evaluate` is the only place ability logic runs; everything around it
/// (caching, invalidation, config) lives in the registry. Implementations
/// may perform I/O — a database-backed ownership check is the typical case.
pub trait ResourcePolicy: Send + Sync + 'static {
    /// Evaluate `ability` for `subject`.
    ///
    /// `model_key` is `Some` for instance-level abilities ("show", "update",
    /// "delete") and `None` for class-level abilities ("list", "create").
    ///
    /// Returning `Err` aborts the check: the registry propagates the error
    /// without caching anything.
    fn evaluate<'a>(
        &'a self,
        subject: &'a Subject,
        ability: &'a str,
        model_key: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<bool, AuthzError>> + Send + 'a>>;

    /// How long decisions for `ability` may be cached.
    ///
    /// Defaults to the framework-wide TTL. Return
    /// [`CacheDuration::Disabled`] to force a fresh evaluation on every
    /// call regardless of the global cache flag.
    fn cache_duration(&self, _ability: &str) -> CacheDuration {
        CacheDuration::Default
    }
}

// ── MockPolicy ─────────────────────────────────────────────────────────

/// In-memory mock policy for testing.
///
/// Grants are explicit `(subject, ability, model_key)` triples; anything
/// not granted is denied. Every `evaluate` call is counted, so tests can
/// assert how often the real check ran behind the cache.
///
/// # Example
///
/// ```ignore
/// use m2e_authz::{MockPolicy, Subject};
///
/// let policy = MockPolicy::new();
/// policy.allow(&Subject::user("1"), "show", Some("42"));
///
/// let registry = registry.with_policy("posts", policy.clone());
/// // ... authorize twice, then:
/// assert_eq!(policy.evaluations(), 1);
/// ```
#[derive(Clone)]
pub struct MockPolicy {
    grants: Arc<DashSet<(Subject, String, Option<String>)>>,
    evaluations: Arc<AtomicUsize>,
    duration: CacheDuration,
    error: Option<String>,
}

impl MockPolicy {
    /// Create a mock that denies everything and caches with the default TTL.
    pub fn new() -> Self {
        Self {
            grants: Arc::new(DashSet::new()),
            evaluations: Arc::new(AtomicUsize::new(0)),
            duration: CacheDuration::Default,
            error: None,
        }
    }

    /// Override the cache duration this policy declares.
    pub fn with_cache_duration(mut self, duration: CacheDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Make every `evaluate` call fail with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new()
        }
    }

    /// Grant `ability` to `subject`, optionally for a single model.
    pub fn allow(&self, subject: &Subject, ability: &str, model_key: Option<&str>) {
        self.grants.insert((
            subject.clone(),
            ability.to_string(),
            model_key.map(String::from),
        ));
    }

    /// Revoke a previously granted triple.
    pub fn revoke(&self, subject: &Subject, ability: &str, model_key: Option<&str>) {
        self.grants.remove(&(
            subject.clone(),
            ability.to_string(),
            model_key.map(String::from),
        ));
    }

    /// How many times `evaluate` has run.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl Default for MockPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourcePolicy for MockPolicy {
    fn evaluate<'a>(
        &'a self,
        subject: &'a Subject,
        ability: &'a str,
        model_key: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<bool, AuthzError>> + Send + 'a>> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let result = match &self.error {
            Some(msg) => Err(AuthzError::PolicyEvaluation(msg.clone())),
            None => Ok(self.grants.contains(&(
                subject.clone(),
                ability.to_string(),
                model_key.map(String::from),
            ))),
        };
        Box::pin(async move { result })
    }

    fn cache_duration(&self, _ability: &str) -> CacheDuration {
        self.duration
    }
}
