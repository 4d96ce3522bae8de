//! rsiam-domain: Core IAM authorization logic
//!
//! This crate contains the policy data model and the decision machinery:
//! role expansion, group membership, condition evaluation, and the
//! per-permission decision engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                rsiam-domain                  │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Policy, Binding, Condition   │
//! │  roles/      - Role -> permission catalog   │
//! │  groups/     - Group membership registry    │
//! │  condition/  - Condition expression eval    │
//! │  engine/     - Per-permission decisions     │
//! │  trace/      - Decision trace events        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and lock-free; the concurrent policy
//! store in `rsiam-storage` owns the shared state and runs this crate's
//! engine under its read guard.

pub mod condition;
pub mod engine;
pub mod error;
pub mod groups;
pub mod model;
pub mod roles;
pub mod trace;

// Re-export commonly used types at the crate root
pub use condition::{EvalContext, ResourceType};
pub use engine::Decision;
pub use error::{DomainError, DomainResult};
pub use model::{AuditConfig, AuditLogConfig, Binding, Condition, Policy};
