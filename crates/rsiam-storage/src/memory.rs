//! The in-memory policy store and decision orchestration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use rsiam_domain::condition::EvalContext;
use rsiam_domain::engine::{self, Decision};
use rsiam_domain::groups::GroupRegistry;
use rsiam_domain::model::Policy;
use rsiam_domain::roles::RoleCatalog;
use rsiam_domain::trace::{AuthzEvent, Outcome, TraceSink};

use crate::error::{StorageError, StorageResult};
use crate::etag;

/// Method label stamped on trace events.
const CHECK_METHOD: &str = "TestIamPermissions";

/// Concurrent mapping from canonical resource names to policies, plus the
/// group table, the custom-role table, and the compat-mode flag.
///
/// One `RwLock` guards all four, so a decision holding the read side sees a
/// consistent snapshot across policy, group, and role state. Decisions
/// prepare their trace events under the guard and emit after releasing it.
pub struct PolicyStore {
    state: RwLock<StoreState>,
    trace_sink: Option<Arc<dyn TraceSink>>,
}

#[derive(Default)]
struct StoreState {
    policies: HashMap<String, Policy>,
    groups: HashMap<String, Vec<String>>,
    custom_roles: HashMap<String, Vec<String>>,
    compat_mode: bool,
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore {
    /// Creates an empty store in strict mode with no trace sink.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            trace_sink: None,
        }
    }

    /// Attaches a sink for decision trace events.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    /// Stores (replacing) the policy for a resource.
    ///
    /// The policy is normalized (version 0 becomes 1), validated (a
    /// version-3 policy must not carry an empty condition expression), and
    /// fingerprinted; the stored form is returned.
    pub fn set_iam_policy(&self, resource: &str, policy: Policy) -> StorageResult<Policy> {
        if resource.is_empty() {
            return Err(StorageError::invalid_argument("resource is required"));
        }

        let policy = Self::normalize(policy)?;

        let mut state = self.state.write();
        state.policies.insert(resource.to_string(), policy.clone());
        Ok(policy)
    }

    /// Returns the policy stored at exactly `resource`.
    ///
    /// Absence is not an error: an unset resource reads as an empty
    /// version-1 policy.
    pub fn get_iam_policy(&self, resource: &str) -> StorageResult<Policy> {
        if resource.is_empty() {
            return Err(StorageError::invalid_argument("resource is required"));
        }

        let state = self.state.read();
        Ok(state
            .policies
            .get(resource)
            .cloned()
            .unwrap_or_else(Policy::empty))
    }

    /// Decides each requested permission for `principal` on `resource` and
    /// returns the allowed subset in request order.
    ///
    /// The effective policy is the nearest ancestor policy (exact match
    /// first, then parents). `principal` may be empty: the legacy path then
    /// skips member matching entirely. When `trace` is set, decisions are
    /// logged and emitted to the configured sink.
    pub fn test_iam_permissions(
        &self,
        resource: &str,
        principal: &str,
        permissions: &[String],
        trace: bool,
    ) -> StorageResult<Vec<String>> {
        if resource.is_empty() {
            return Err(StorageError::invalid_argument("resource is required"));
        }
        if permissions.is_empty() {
            return Err(StorageError::invalid_argument("permissions is required"));
        }

        let started = Instant::now();
        let now = Utc::now();
        let emit_events = trace && self.trace_sink.is_some();

        let state = self.state.read();

        let Some(policy) = resolve_policy(&state.policies, resource) else {
            if trace {
                for permission in permissions {
                    info!(
                        decision = "DENY",
                        resource,
                        principal,
                        permission = permission.as_str(),
                        reason = "no policy found",
                        "authz decision"
                    );
                }
            }
            let events = if emit_events {
                let latency_ms = started.elapsed().as_secs_f64() * 1e3;
                permissions
                    .iter()
                    .map(|permission| {
                        AuthzEvent::check(
                            principal,
                            resource,
                            permission,
                            CHECK_METHOD,
                            Outcome::Deny,
                            "no policy found".to_string(),
                            latency_ms,
                        )
                    })
                    .collect()
            } else {
                Vec::new()
            };
            drop(state);
            self.emit(events);
            return Ok(Vec::new());
        };

        let ctx = EvalContext::new(resource, now);
        let catalog = RoleCatalog::new(&state.custom_roles, state.compat_mode);
        let registry = GroupRegistry::new(&state.groups);

        let decisions =
            engine::check_permissions(policy, principal, permissions, &ctx, &catalog, &registry);

        if trace {
            for decision in &decisions {
                info!(
                    decision = if decision.allowed { "ALLOW" } else { "DENY" },
                    resource,
                    principal,
                    permission = decision.permission.as_str(),
                    reason = decision.reason.as_str(),
                    "authz decision"
                );
            }
        }

        let events = if emit_events {
            let latency_ms = started.elapsed().as_secs_f64() * 1e3;
            decisions
                .iter()
                .map(|decision| self.event_for(principal, resource, decision, latency_ms))
                .collect()
        } else {
            Vec::new()
        };

        let allowed = decisions
            .into_iter()
            .filter(|d| d.allowed)
            .map(|d| d.permission)
            .collect();

        drop(state);
        self.emit(events);

        Ok(allowed)
    }

    /// Bulk-loads policies, replacing prior entries for the same keys.
    /// Each entry is normalized and validated like a single write.
    pub fn load_policies(&self, policies: HashMap<String, Policy>) -> StorageResult<()> {
        let mut normalized = HashMap::with_capacity(policies.len());
        for (resource, policy) in policies {
            if resource.is_empty() {
                return Err(StorageError::invalid_argument("resource is required"));
            }
            normalized.insert(resource, Self::normalize(policy)?);
        }

        let mut state = self.state.write();
        state.policies.extend(normalized);
        Ok(())
    }

    /// Replaces the group table wholesale.
    pub fn load_groups(&self, groups: HashMap<String, Vec<String>>) {
        self.state.write().groups = groups;
    }

    /// Replaces the custom-role table wholesale.
    pub fn load_custom_roles(&self, roles: HashMap<String, Vec<String>>) {
        self.state.write().custom_roles = roles;
    }

    /// Switches between strict (default) and compat role resolution.
    pub fn set_compat_mode(&self, compat: bool) {
        self.state.write().compat_mode = compat;
    }

    /// Reports the current role-resolution mode.
    pub fn compat_mode(&self) -> bool {
        self.state.read().compat_mode
    }

    /// Wipes all stored state. The mode flag resets to strict.
    pub fn clear(&self) {
        *self.state.write() = StoreState::default();
    }

    fn normalize(mut policy: Policy) -> StorageResult<Policy> {
        policy.normalize();
        policy
            .validate()
            .map_err(|e| StorageError::invalid_argument(e.to_string()))?;
        policy.etag = etag::fingerprint(&policy);
        Ok(policy)
    }

    fn event_for(
        &self,
        principal: &str,
        resource: &str,
        decision: &Decision,
        latency_ms: f64,
    ) -> AuthzEvent {
        AuthzEvent::check(
            principal,
            resource,
            &decision.permission,
            CHECK_METHOD,
            if decision.allowed {
                Outcome::Allow
            } else {
                Outcome::Deny
            },
            decision.reason.clone(),
            latency_ms,
        )
    }

    fn emit(&self, events: Vec<AuthzEvent>) {
        let Some(sink) = &self.trace_sink else {
            return;
        };
        if events.is_empty() {
            return;
        }
        for event in &events {
            sink.emit(event);
        }
        sink.flush();
    }
}

/// Finds the nearest policy for authorization: exact match, then ancestors
/// obtained by stripping the trailing collection/id segment pair until
/// fewer than three segments remain. `projects/<id>` is the last candidate.
fn resolve_policy<'a>(
    policies: &'a HashMap<String, Policy>,
    resource: &str,
) -> Option<&'a Policy> {
    if let Some(policy) = policies.get(resource) {
        return Some(policy);
    }

    let mut current = resource;
    let mut segments = current.split('/').count();
    while segments > 2 {
        let last = current.rfind('/')?;
        let second_last = current[..last].rfind('/')?;
        current = &current[..second_last];
        segments -= 2;
        if let Some(policy) = policies.get(current) {
            return Some(policy);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsiam_domain::model::Binding;

    fn policy_with(role: &str, member: &str) -> Policy {
        Policy {
            version: 1,
            bindings: vec![Binding {
                role: role.to_string(),
                members: vec![member.to_string()],
                condition: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let mut policies = HashMap::new();
        policies.insert("projects/p".to_string(), policy_with("roles/viewer", "user:a"));
        policies.insert(
            "projects/p/secrets/s".to_string(),
            policy_with("roles/owner", "user:b"),
        );

        let resolved = resolve_policy(&policies, "projects/p/secrets/s").unwrap();
        assert_eq!(resolved.bindings[0].role, "roles/owner");
    }

    #[test]
    fn test_resolve_walks_to_project_root() {
        let mut policies = HashMap::new();
        policies.insert("projects/p".to_string(), policy_with("roles/viewer", "user:a"));

        let resolved = resolve_policy(
            &policies,
            "projects/p/locations/l/keyRings/r/cryptoKeys/k/cryptoKeyVersions/v",
        );
        assert!(resolved.is_some());
    }

    #[test]
    fn test_resolve_stops_at_nearest_ancestor() {
        let mut policies = HashMap::new();
        policies.insert("projects/p".to_string(), policy_with("roles/viewer", "user:a"));
        policies.insert(
            "projects/p/keyRings/r".to_string(),
            policy_with("roles/cloudkms.admin", "user:b"),
        );

        let resolved = resolve_policy(&policies, "projects/p/keyRings/r/cryptoKeys/k").unwrap();
        assert_eq!(resolved.bindings[0].role, "roles/cloudkms.admin");
    }

    #[test]
    fn test_resolve_without_any_policy_is_none() {
        let policies = HashMap::new();
        assert!(resolve_policy(&policies, "projects/p/secrets/s").is_none());
        assert!(resolve_policy(&policies, "projects/p").is_none());
    }

    #[test]
    fn test_set_rejects_empty_resource() {
        let store = PolicyStore::new();
        let err = store.set_iam_policy("", Policy::empty()).unwrap_err();
        assert!(err.to_string().contains("resource"));
    }

    #[test]
    fn test_test_permissions_rejects_empty_arguments() {
        let store = PolicyStore::new();

        let err = store
            .test_iam_permissions("", "user:a", &["p.q.r".to_string()], false)
            .unwrap_err();
        assert!(err.to_string().contains("resource"));

        let err = store
            .test_iam_permissions("projects/p", "user:a", &[], false)
            .unwrap_err();
        assert!(err.to_string().contains("permissions"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let store = PolicyStore::new();
        store
            .set_iam_policy("projects/p", policy_with("roles/viewer", "user:a"))
            .unwrap();
        store.load_groups(HashMap::from([(
            "g".to_string(),
            vec!["user:a".to_string()],
        )]));
        store.set_compat_mode(true);

        store.clear();

        assert!(store.get_iam_policy("projects/p").unwrap().bindings.is_empty());
        assert!(!store.compat_mode());
    }
}
