//! Domain error types for policy validation.

use thiserror::Error;

/// Domain-specific errors raised when a policy fails validation.
///
/// The decision path itself never fails: unresolved roles grant nothing,
/// malformed conditions evaluate to a deny with a reason.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A version-3 policy carries a condition with an empty expression.
    #[error("condition expression cannot be empty when version is 3")]
    EmptyConditionExpression,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
