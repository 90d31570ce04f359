//! The acting principal of an authorization check.

use std::fmt;

/// The acting principal: an authenticated user or an anonymous caller.
///
/// Decisions are cached per subject, so the subject carries a stable opaque
/// identifier (a JWT `sub`, a database key, ...). All anonymous callers
/// share one cache partition.
///
/// The subject is always an explicit argument — there is no ambient
/// "current user" lookup anywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// No authenticated principal.
    Anonymous,
    /// An authenticated principal with a stable identifier.
    User(String),
}

impl Subject {
    /// Shorthand for [`Subject::User`].
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The segment identifying this subject in cache keys.
    pub fn cache_segment(&self) -> &str {
        match self {
            Self::Anonymous => "guest",
            Self::User(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_segment())
    }
}
