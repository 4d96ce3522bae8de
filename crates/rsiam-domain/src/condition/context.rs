//! Evaluation context for condition expressions.

use std::fmt;

use chrono::{DateTime, Utc};

/// The resource type visible to `resource.type` expressions, derived from
/// the resource name by substring detection, most-specific segment first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Secret,
    CryptoKey,
    KeyRing,
    Unknown,
}

impl ResourceType {
    /// Derives the resource type from a canonical resource name.
    pub fn from_resource_name(name: &str) -> Self {
        if name.contains("/secrets/") {
            ResourceType::Secret
        } else if name.contains("/cryptoKeys/") {
            ResourceType::CryptoKey
        } else if name.contains("/keyRings/") {
            ResourceType::KeyRing
        } else {
            ResourceType::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Secret => "SECRET",
            ResourceType::CryptoKey => "CRYPTO_KEY",
            ResourceType::KeyRing => "KEY_RING",
            ResourceType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request evaluation context.
///
/// `request_time` is captured once when the decision begins, so every
/// condition of a single request sees the same instant.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub resource_name: &'a str,
    pub resource_type: ResourceType,
    pub request_time: DateTime<Utc>,
}

impl<'a> EvalContext<'a> {
    /// Builds the context for a decision on `resource_name` at `now`.
    pub fn new(resource_name: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            resource_name,
            resource_type: ResourceType::from_resource_name(resource_name),
            request_time: now,
        }
    }
}
