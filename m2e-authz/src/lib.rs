//! Policy-based authorization for M2E repositories.
//!
//! This crate decides, per subject, per ability, per model, whether an
//! operation is permitted — and caches those decisions so a hot endpoint
//! does not re-run the same policy on every request.
//!
//! # Overview
//!
//! Every exposed resource can register a [`ResourcePolicy`]: one object
//! holding the authorization rules for that resource's abilities ("list",
//! "show", "update", ...). The [`PolicyRegistry`] resolves checks:
//!
//! - **Subjects** perform **abilities** on **targets**
//! - Example: user `7` performs `show` on post `42`
//!
//! Decisions are cached per `(subject, ability, target)` with a TTL the
//! policy itself controls, so one slow ownership query serves many requests.
//!
//! # Setup
//!
//! ```ignore
//! use m2e_authz::{AuthzConfig, PolicyRegistry, Subject, Target};
//! use m2e_cache::InMemoryStore;
//! use std::sync::Arc;
//!
//! let config = AuthzConfig::new().with_default_ttl(300);
//! let registry = PolicyRegistry::new(config, Arc::new(InMemoryStore::new()))
//!     .with_policy("posts", PostPolicy::new(pool.clone()))
//!     .with_policy("comments", CommentPolicy::new(pool));
//!
//! // Add to application state; handlers resolve checks through it
//! let allowed = registry
//!     .authorize(&Subject::user("7"), "show", &Target::instance("posts", "42"))
//!     .await?;
//! ```
//!
//! # Architecture
//!
//! The crate is split into two concerns:
//!
//! - **[`PolicyRegistry`]** — maps resource identifiers to policies and
//!   orchestrates each check: config flag, the policy's own
//!   [`CacheDuration`], cache lookup, real evaluation, cache store.
//! - **[`PolicyCache`]** — deterministic keys over any
//!   [`CacheStore`](m2e_cache::CacheStore). Keys are partitioned per
//!   subject, so one caller's cached denial never answers for another.
//!
//! The cache is an optimization, never a gate: when the store is down every
//! check falls through to the real policy and the fault is only logged.
//!
//! # Writing a policy
//!
//! ```ignore
//! use m2e_authz::{AuthzError, CacheDuration, ResourcePolicy, Subject};
//! use std::time::Duration;
//!
//! struct PostPolicy { pool: SqlitePool }
//!
//! impl ResourcePolicy for PostPolicy {
//!     fn evaluate<'a>(&'a self, subject: &'a Subject, ability: &'a str, model_key: Option<&'a str>)
//!         -> Pin<Box<dyn Future<Output = Result<bool, AuthzError>> + Send + 'a>>
//!     {
//!         Box::pin(async move {
//!             match (ability, model_key) {
//!                 ("list", _) => Ok(true),
//!                 ("update", Some(id)) => self.owns(subject, id).await,
//!                 _ => Ok(false),
//!             }
//!         })
//!     }
//!
//!     fn cache_duration(&self, ability: &str) -> CacheDuration {
//!         match ability {
//!             // ownership rarely changes; re-check volatile abilities every time
//!             "update" => CacheDuration::For(Duration::from_secs(180)),
//!             "publish" => CacheDuration::Disabled,
//!             _ => CacheDuration::Default,
//!         }
//!     }
//! }
//! ```
//!
//! # Invalidation
//!
//! The write path owns invalidation: after a create, update or delete, call
//! [`PolicyRegistry::invalidate`] with the mutated model's key (or with
//! `None` to purge the whole resource). Expiry handles the rest.
//!
//! # Testing
//!
//! Use the mock policy to assert on cache behavior:
//!
//! ```ignore
//! use m2e_authz::{MockPolicy, Subject, Target};
//!
//! let policy = MockPolicy::new();
//! policy.allow(&Subject::user("1"), "show", Some("42"));
//!
//! let registry = registry.with_policy("posts", policy.clone());
//! registry.authorize(&Subject::user("1"), "show", &Target::instance("posts", "42")).await?;
//! registry.authorize(&Subject::user("1"), "show", &Target::instance("posts", "42")).await?;
//! assert_eq!(policy.evaluations(), 1);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod registry;
pub mod subject;

// Re-exports
pub use cache::PolicyCache;
pub use config::AuthzConfig;
pub use error::AuthzError;
pub use policy::{CacheDuration, MockPolicy, ResourcePolicy};
pub use registry::{PolicyRegistry, Target};
pub use subject::Subject;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::AuthzConfig;
    pub use crate::error::AuthzError;
    pub use crate::policy::{CacheDuration, ResourcePolicy};
    pub use crate::registry::{PolicyRegistry, Target};
    pub use crate::subject::Subject;
}
