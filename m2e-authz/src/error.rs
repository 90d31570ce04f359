//! Error types for authorization.

use std::fmt;

/// Errors surfaced by the authorization core.
///
/// A failed policy evaluation is never cached and never coerced into a
/// denial by this crate — it propagates so the caller can refuse the
/// request (fail-closed) and report the fault.
#[derive(Debug)]
pub enum AuthzError {
    /// The ability was denied for the subject.
    Forbidden { resource: String, ability: String },
    /// The policy's own evaluation failed.
    PolicyEvaluation(String),
}

impl fmt::Display for AuthzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthzError::Forbidden { resource, ability } => {
                write!(f, "'{}' forbidden on '{}'", ability, resource)
            }
            AuthzError::PolicyEvaluation(msg) => {
                write!(f, "policy evaluation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for AuthzError {}
