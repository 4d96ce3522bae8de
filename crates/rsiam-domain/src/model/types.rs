//! Core type definitions for the policy model.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Sentinel member matching every caller, authenticated or not.
pub const ALL_USERS: &str = "allUsers";

/// Sentinel member matching every caller that presented an identity.
pub const ALL_AUTHENTICATED_USERS: &str = "allAuthenticatedUsers";

/// Prefix marking a member (or principal) as a group reference.
pub const GROUP_PREFIX: &str = "group:";

/// An IAM policy: a versioned list of bindings attached to one resource.
///
/// `etag` is a deterministic fingerprint of the policy contents, computed
/// by the store on write; it is empty on policies that were never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub version: i32,
    pub bindings: Vec<Binding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit_configs: Vec<AuditConfig>,
    pub etag: String,
}

impl Policy {
    /// An empty version-1 policy, returned by reads of unset resources.
    pub fn empty() -> Self {
        Self {
            version: 1,
            ..Default::default()
        }
    }

    /// Normalizes the stored version: unset (0) becomes 1.
    pub fn normalize(&mut self) {
        if self.version == 0 {
            self.version = 1;
        }
    }

    /// Validates the policy for a write.
    ///
    /// A version-3 policy must not carry a binding whose condition is
    /// present with an empty expression.
    pub fn validate(&self) -> DomainResult<()> {
        if self.version == 3 {
            for binding in &self.bindings {
                if let Some(condition) = &binding.condition {
                    if condition.expression.is_empty() {
                        return Err(DomainError::EmptyConditionExpression);
                    }
                }
            }
        }
        Ok(())
    }
}

/// The unit of authorization: a role granted to a set of members,
/// optionally gated by a condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Binding {
    pub role: String,
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// A boolean predicate over the evaluation context, in the constrained
/// expression grammar of [`crate::condition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    pub expression: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Audit configuration for a service. Accepted and stored, never enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditConfig {
    pub service: String,
    pub audit_log_configs: Vec<AuditLogConfig>,
}

/// A single audit log configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditLogConfig {
    pub log_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exempted_members: Vec<String>,
}
