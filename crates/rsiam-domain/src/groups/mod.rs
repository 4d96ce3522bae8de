//! Group registry: bounded-depth membership resolution.
//!
//! A group maps to the ordered list of its direct members. Membership
//! checks follow at most one level of `group:` indirection, scanning the
//! nested group's direct members only. The depth bound makes membership
//! cycles harmless without a visited set.

use std::collections::HashMap;

/// A borrowed view over the group table, valid for one decision.
#[derive(Debug, Clone, Copy)]
pub struct GroupRegistry<'a> {
    groups: &'a HashMap<String, Vec<String>>,
}

impl<'a> GroupRegistry<'a> {
    pub fn new(groups: &'a HashMap<String, Vec<String>>) -> Self {
        Self { groups }
    }

    /// Returns true when `principal` appears among the members of `group`,
    /// directly or through one nested group.
    pub fn is_member(&self, group: &str, principal: &str) -> bool {
        let Some(members) = self.groups.get(group) else {
            return false;
        };

        for member in members {
            if member == principal {
                return true;
            }
            if let Some(nested) = member.strip_prefix(crate::model::GROUP_PREFIX) {
                if let Some(nested_members) = self.groups.get(nested) {
                    if nested_members.iter().any(|m| m == principal) {
                        return true;
                    }
                }
            }
        }

        false
    }
}
