//! Deterministic policy fingerprints.
//!
//! The etag is the base64 encoding of the SHA-256 digest of a canonical
//! serialization of the policy. Canonical form: the etag field cleared,
//! members sorted within each binding, bindings sorted by (role, members,
//! condition), audit configs sorted by service, then encoded as JSON with
//! the fixed struct field order. Sorting happens only in the fingerprint:
//! the stored policy keeps its binding order.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use rsiam_domain::model::Policy;

/// Computes the etag for a policy about to be stored.
pub fn fingerprint(policy: &Policy) -> String {
    let digest = Sha256::digest(canonical_bytes(policy));
    BASE64_STANDARD.encode(digest)
}

fn canonical_bytes(policy: &Policy) -> Vec<u8> {
    let mut canonical = policy.clone();
    canonical.etag = String::new();

    for binding in &mut canonical.bindings {
        binding.members.sort();
    }
    canonical.bindings.sort_by(|a, b| {
        let key = |x: &rsiam_domain::model::Binding| {
            (
                x.role.clone(),
                x.members.clone(),
                x.condition
                    .as_ref()
                    .map(|c| (c.expression.clone(), c.title.clone(), c.description.clone())),
            )
        };
        key(a).cmp(&key(b))
    });
    canonical
        .audit_configs
        .sort_by(|a, b| a.service.cmp(&b.service));

    // Struct field order is fixed, so the JSON encoding is deterministic.
    serde_json::to_vec(&canonical).unwrap_or_default()
}
