//! Policy seed documents.
//!
//! A seed document is a YAML file with three top-level sections: `projects`
//! (bindings at the project and at relative resource paths beneath it),
//! `groups`, and `roles`. The loader flattens projects and resources into
//! canonical resource keys before handing the maps to the store.
//!
//! ```yaml
//! projects:
//!   test-project:
//!     bindings:
//!       - role: roles/viewer
//!         members: ["user:dev@example.com"]
//!     resources:
//!       secrets/db-password:
//!         bindings:
//!           - role: roles/secretmanager.secretAccessor
//!             members: ["serviceAccount:app@test.iam.gserviceaccount.com"]
//! groups:
//!   engineers:
//!     members: ["user:alice@example.com", "group:contractors"]
//! roles:
//!   roles/custom.deployer:
//!     permissions: ["secretmanager.versions.access"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use rsiam_domain::model::{AuditConfig, Binding, Policy};

/// Error type for seed loading.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The parsed seed document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedDocument {
    pub projects: HashMap<String, ProjectSection>,
    pub groups: HashMap<String, GroupSection>,
    pub roles: HashMap<String, RoleSection>,
}

/// Bindings attached to a project and to resources beneath it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSection {
    pub bindings: Vec<Binding>,
    pub resources: HashMap<String, ResourceSection>,
    pub audit_configs: Vec<AuditConfig>,
}

/// Bindings attached to a single resource, keyed by its path relative to
/// the project.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceSection {
    pub bindings: Vec<Binding>,
    pub audit_configs: Vec<AuditConfig>,
}

/// A group and its direct members.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupSection {
    pub members: Vec<String>,
}

/// A custom role and the permissions it grants.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleSection {
    pub permissions: Vec<String>,
}

impl SeedDocument {
    /// Reads and parses a seed document from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Flattens the projects section into canonical resource keys.
    ///
    /// Policy versions are derived from content: 3 when any binding carries
    /// a condition, 1 otherwise.
    pub fn to_policies(&self) -> HashMap<String, Policy> {
        let mut policies = HashMap::new();

        for (project_id, project) in &self.projects {
            let project_resource = format!("projects/{project_id}");

            if !project.bindings.is_empty() || !project.audit_configs.is_empty() {
                policies.insert(
                    project_resource.clone(),
                    assemble_policy(&project.bindings, &project.audit_configs),
                );
            }

            for (relative_path, resource) in &project.resources {
                let full_resource = format!("{project_resource}/{relative_path}");
                policies.insert(
                    full_resource,
                    assemble_policy(&resource.bindings, &resource.audit_configs),
                );
            }
        }

        policies
    }

    /// The group table in the shape the store loads.
    pub fn to_groups(&self) -> HashMap<String, Vec<String>> {
        self.groups
            .iter()
            .map(|(name, group)| (name.clone(), group.members.clone()))
            .collect()
    }

    /// The custom-role table in the shape the store loads.
    pub fn to_custom_roles(&self) -> HashMap<String, Vec<String>> {
        self.roles
            .iter()
            .map(|(role, section)| (role.clone(), section.permissions.clone()))
            .collect()
    }
}

fn assemble_policy(bindings: &[Binding], audit_configs: &[AuditConfig]) -> Policy {
    let mut policy = Policy {
        bindings: bindings.to_vec(),
        audit_configs: audit_configs.to_vec(),
        ..Default::default()
    };
    policy.version = derived_version(&policy);
    policy
}

fn derived_version(policy: &Policy) -> i32 {
    if policy.bindings.iter().any(|b| b.condition.is_some()) {
        3
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
projects:
  test-project:
    bindings:
      - role: roles/viewer
        members:
          - user:dev@example.com
    resources:
      secrets/db-password:
        bindings:
          - role: roles/secretmanager.secretAccessor
            members:
              - serviceAccount:app@test.iam.gserviceaccount.com
            condition:
              expression: resource.name.startsWith("projects/test-project/")
              title: project only
      secrets/api-key:
        bindings:
          - role: roles/secretmanager.secretAccessor
            members:
              - allUsers
        auditConfigs:
          - service: secretmanager.googleapis.com
            auditLogConfigs:
              - logType: DATA_READ

groups:
  engineers:
    members:
      - user:alice@example.com
      - group:contractors
  contractors:
    members:
      - user:bob@example.com

roles:
  roles/custom.deployer:
    permissions:
      - secretmanager.versions.access
      - secretmanager.versions.add
"#;

    #[test]
    fn test_parses_all_sections() {
        let doc: SeedDocument = serde_yaml::from_str(DOCUMENT).unwrap();

        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.roles.len(), 1);
    }

    #[test]
    fn test_flattens_projects_into_canonical_keys() {
        let doc: SeedDocument = serde_yaml::from_str(DOCUMENT).unwrap();
        let policies = doc.to_policies();

        assert_eq!(policies.len(), 3);
        assert!(policies.contains_key("projects/test-project"));
        assert!(policies.contains_key("projects/test-project/secrets/db-password"));
        assert!(policies.contains_key("projects/test-project/secrets/api-key"));
    }

    #[test]
    fn test_version_derivation_from_conditions() {
        let doc: SeedDocument = serde_yaml::from_str(DOCUMENT).unwrap();
        let policies = doc.to_policies();

        // No conditions at the project level.
        assert_eq!(policies["projects/test-project"].version, 1);
        // The conditional binding forces version 3.
        assert_eq!(
            policies["projects/test-project/secrets/db-password"].version,
            3
        );
    }

    #[test]
    fn test_audit_configs_are_carried() {
        let doc: SeedDocument = serde_yaml::from_str(DOCUMENT).unwrap();
        let policies = doc.to_policies();

        let api_key = &policies["projects/test-project/secrets/api-key"];
        assert_eq!(api_key.audit_configs.len(), 1);
        assert_eq!(api_key.audit_configs[0].service, "secretmanager.googleapis.com");
        assert_eq!(api_key.audit_configs[0].audit_log_configs[0].log_type, "DATA_READ");
    }

    #[test]
    fn test_group_and_role_tables() {
        let doc: SeedDocument = serde_yaml::from_str(DOCUMENT).unwrap();

        let groups = doc.to_groups();
        assert_eq!(groups["engineers"].len(), 2);
        assert_eq!(groups["contractors"], vec!["user:bob@example.com"]);

        let roles = doc.to_custom_roles();
        assert_eq!(roles["roles/custom.deployer"].len(), 2);
    }

    #[test]
    fn test_project_without_bindings_gets_no_policy() {
        let doc: SeedDocument = serde_yaml::from_str(
            r#"
projects:
  empty-project:
    resources:
      secrets/s:
        bindings:
          - role: roles/viewer
            members: ["user:a@example.com"]
"#,
        )
        .unwrap();

        let policies = doc.to_policies();
        assert!(!policies.contains_key("projects/empty-project"));
        assert!(policies.contains_key("projects/empty-project/secrets/s"));
    }

    #[test]
    fn test_empty_document_parses() {
        let doc: SeedDocument = serde_yaml::from_str("{}").unwrap();
        assert!(doc.to_policies().is_empty());
        assert!(doc.to_groups().is_empty());
        assert!(doc.to_custom_roles().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.yaml");
        std::fs::write(&path, DOCUMENT).unwrap();

        let doc = SeedDocument::load_from_file(&path).unwrap();
        assert_eq!(doc.projects.len(), 1);

        let missing = SeedDocument::load_from_file(dir.path().join("absent.yaml"));
        assert!(matches!(missing, Err(SeedError::Io(_))));
    }
}
