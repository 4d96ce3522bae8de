//! Policy data model.
//!
//! The types here mirror the wire shape of a cloud IAM policy document:
//! a policy is a list of bindings, each binding grants a role to a set of
//! members, optionally gated by a condition. Serialization uses camelCase
//! field names to match the JSON/YAML documents clients exchange.

mod types;

pub use types::{
    AuditConfig, AuditLogConfig, Binding, Condition, Policy, ALL_AUTHENTICATED_USERS, ALL_USERS,
    GROUP_PREFIX,
};
