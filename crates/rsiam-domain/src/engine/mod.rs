//! Per-permission decision engine.
//!
//! The engine is a pure function over a resolved policy and the catalog /
//! group views: no locks, no IO, no clock reads. Callers capture the
//! request time once, resolve the policy, and hand everything in; identical
//! inputs produce identical decisions and reasons.

use crate::condition::{self, EvalContext};
use crate::groups::GroupRegistry;
use crate::model::{Policy, ALL_AUTHENTICATED_USERS, ALL_USERS, GROUP_PREFIX};
use crate::roles::RoleCatalog;

/// The outcome for a single requested permission.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub permission: String,
    pub allowed: bool,
    pub reason: String,
}

/// Decides every requested permission against `policy`, in request order.
pub fn check_permissions(
    policy: &Policy,
    principal: &str,
    permissions: &[String],
    ctx: &EvalContext<'_>,
    catalog: &RoleCatalog<'_>,
    groups: &GroupRegistry<'_>,
) -> Vec<Decision> {
    permissions
        .iter()
        .map(|permission| {
            let (allowed, reason) =
                check_permission(policy, principal, permission, ctx, catalog, groups);
            Decision {
                permission: permission.clone(),
                allowed,
                reason,
            }
        })
        .collect()
}

/// Decides a single permission.
///
/// Bindings are scanned in stored order. A binding whose role does not
/// grant the permission is skipped. With no principal, a binding matches as
/// soon as its role grants the permission (legacy callers that only ask
/// "does the policy grant this to anyone?"). A matched binding with a
/// failing condition denies the permission outright: later bindings are not
/// consulted.
pub fn check_permission(
    policy: &Policy,
    principal: &str,
    permission: &str,
    ctx: &EvalContext<'_>,
    catalog: &RoleCatalog<'_>,
    groups: &GroupRegistry<'_>,
) -> (bool, String) {
    if principal.is_empty() {
        for binding in &policy.bindings {
            if catalog.grants(&binding.role, permission) {
                return (
                    true,
                    format!("matched role={} (no principal check)", binding.role),
                );
            }
        }
        return (
            false,
            "no role grants permission (no principal provided)".to_string(),
        );
    }

    for binding in &policy.bindings {
        if !catalog.grants(&binding.role, permission) {
            continue;
        }

        for member in &binding.members {
            if !member_matches(member, principal, groups) {
                continue;
            }

            let Some(cond) = &binding.condition else {
                return (
                    true,
                    format!("matched binding: role={} member={member}", binding.role),
                );
            };

            let (satisfied, cond_reason) = condition::evaluate(cond, ctx);
            if !satisfied {
                return (false, format!("condition failed: {cond_reason}"));
            }
            return (
                true,
                format!(
                    "matched binding: role={} member={member} condition={cond_reason}",
                    binding.role
                ),
            );
        }
    }

    (false, "no matching binding found for principal".to_string())
}

/// Tests whether a binding member matches the caller's principal.
fn member_matches(member: &str, principal: &str, groups: &GroupRegistry<'_>) -> bool {
    if member == principal {
        return true;
    }

    if member == ALL_USERS || member == ALL_AUTHENTICATED_USERS {
        return true;
    }

    if let Some(group) = member.strip_prefix(GROUP_PREFIX) {
        return groups.is_member(group, principal);
    }

    false
}
