//! Role catalog: resolves a role identifier to the permissions it grants.
//!
//! Lookup order, first match wins with no merging across tiers:
//!
//! 1. Custom roles (user-supplied). A custom role is authoritative even
//!    when its id collides with a built-in role.
//! 2. The built-in catalog ([`builtin`]).
//! 3. In compat mode only, a wildcard fallback: a `roles/`-prefixed id
//!    whose first dot-separated token equals the queried permission's
//!    service token grants that single permission.
//!
//! Resolution never fails; an unknown role simply grants nothing.

mod builtin;

use std::collections::HashMap;

/// A borrowed view over the role catalog, valid for one decision.
///
/// The view carries the custom-role table and the compat-mode flag as they
/// were when the store's read guard was taken, so every binding of a single
/// request observes the same catalog.
#[derive(Debug, Clone, Copy)]
pub struct RoleCatalog<'a> {
    custom_roles: &'a HashMap<String, Vec<String>>,
    compat_mode: bool,
}

impl<'a> RoleCatalog<'a> {
    pub fn new(custom_roles: &'a HashMap<String, Vec<String>>, compat_mode: bool) -> Self {
        Self {
            custom_roles,
            compat_mode,
        }
    }

    /// Returns true when `role` grants `permission`.
    pub fn grants(&self, role: &str, permission: &str) -> bool {
        if let Some(perms) = self.custom_roles.get(role) {
            return perms.iter().any(|p| p == permission);
        }

        if let Some(perms) = builtin::permissions(role) {
            return perms.contains(&permission);
        }

        self.compat_mode && wildcard_matches(role, permission)
    }
}

/// Compat-mode fallback for roles outside the catalogs.
///
/// The role's name (after `roles/`) is split on `.`; its first token must
/// equal the permission's service token. `roles/secretmanager.anything`
/// therefore grants `secretmanager.versions.access` but nothing under
/// `cloudkms.`.
fn wildcard_matches(role: &str, permission: &str) -> bool {
    let Some(role_name) = role.strip_prefix("roles/") else {
        return false;
    };

    let role_service = role_name.split('.').next().unwrap_or_default();
    let permission_service = permission.split('.').next().unwrap_or_default();

    !role_service.is_empty() && role_service == permission_service
}
