//! Configuration for policy decision caching.

use std::time::Duration;

use serde::Deserialize;

fn default_enabled() -> bool { true }
fn default_ttl() -> u64 { 300 }

/// Configuration for policy decision caching.
///
/// Can be deserialized from the host application's config file; all fields
/// have defaults. Pass it to [`PolicyRegistry::new`](crate::PolicyRegistry::new) —
/// there is no process-wide setting, so isolated registries with different
/// configurations can coexist (tests rely on this).
///
/// ```yaml
/// authz:
///   enabled: true          # default: true
///   default_ttl_secs: 300  # default: 300
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AuthzConfig {
    /// Whether decisions are cached at all. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// TTL applied when a policy does not declare its own. Default: 300.
    #[serde(default = "default_ttl")]
    pub default_ttl_secs: u64,
}

impl AuthzConfig {
    pub fn new() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: 300,
        }
    }

    /// Set the TTL applied when a policy does not declare its own.
    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    /// Disable decision caching entirely.
    pub fn without_cache(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub(crate) fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self::new()
    }
}
