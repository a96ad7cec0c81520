//! TOML-driven role catalog.
//!
//! `RoleCatalog` loads a `CatalogConfig` from a TOML string or file and
//! resolves every definition into a `Role` value up front, so lookups never
//! fail on malformed input later.
//!
//! Resolution runs in declaration order:
//!
//! 1. Reject a name that was already declared.
//! 2. Build the role from its `kind`, resolving `includes` and `manages`
//!    against roles declared earlier in the file.
//! 3. Record it under its name.

use std::{collections::HashMap, path::Path};

use tracing::{debug, info, warn};

use crate::{
    config::{CatalogConfig, RoleDefinition, RoleKind},
    error::{WardenError, WardenResult},
    permission::Permission,
    resource::Resource,
    role::Role,
};

#[derive(Debug, Clone)]
struct Entry {
    description: String,
    role: Role,
}

/// Named roles resolved from a TOML catalog.
///
/// ```rust,ignore
/// use warden_policy::RoleCatalog;
///
/// let catalog = RoleCatalog::from_file(Path::new("demo/catalog.toml"))?;
/// let editor = catalog.role("editor")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

impl RoleCatalog {
    /// Parse `s` as TOML and resolve every role in it.
    ///
    /// Returns `WardenError::ConfigError` if the TOML is malformed, does not
    /// match `CatalogConfig`, or a definition cannot be resolved.
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        let config: CatalogConfig = toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse role catalog TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a role catalog.
    pub fn from_file(path: &Path) -> WardenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to read role catalog '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolve an already-parsed catalog, in declaration order.
    pub fn from_config(config: CatalogConfig) -> WardenResult<Self> {
        let mut catalog = Self::default();
        for definition in config.roles {
            catalog.insert(definition)?;
        }
        info!(roles = catalog.len(), "role catalog loaded");
        Ok(catalog)
    }

    /// The role declared under `name`.
    ///
    /// Returns `WardenError::ConfigError` if no such role was declared.
    pub fn role(&self, name: &str) -> WardenResult<&Role> {
        self.entries
            .get(name)
            .map(|e| &e.role)
            .ok_or_else(|| WardenError::ConfigError {
                reason: format!("role '{}' is not declared in the catalog", name),
            })
    }

    /// The description declared for `name`, if any.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.description.as_str())
    }

    /// Role names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of declared roles.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the catalog declares no roles.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, definition: RoleDefinition) -> WardenResult<()> {
        let RoleDefinition {
            name,
            description,
            kind,
        } = definition;

        if self.entries.contains_key(&name) {
            warn!(role = %name, "duplicate role name in catalog");
            return Err(WardenError::ConfigError {
                reason: format!("role '{}' is declared more than once", name),
            });
        }

        let role = self.resolve(&name, kind)?;
        debug!(role = %name, value = %role, "catalog role resolved");
        self.order.push(name.clone());
        self.entries.insert(name, Entry { description, role });
        Ok(())
    }

    fn resolve(&self, name: &str, kind: RoleKind) -> WardenResult<Role> {
        let role = match kind {
            RoleKind::Superuser => Role::SuperUser,
            RoleKind::NoRole => Role::NoRole,
            RoleKind::Operations {
                operations,
                exclude,
            } => {
                require_operations(name, &operations)?;
                Role::from(Permission::operations(&operations) - Permission::operations(&exclude))
            }
            RoleKind::Resource {
                resource,
                operations,
            } => {
                require_operations(name, &operations)?;
                let resource = Resource::parse(&resource).map_err(|e| WardenError::ConfigError {
                    reason: format!("role '{}' has an invalid resource: {}", name, e),
                })?;
                Role::resource(resource, &operations)
            }
            RoleKind::Union { includes } => {
                if includes.is_empty() {
                    return Err(WardenError::ConfigError {
                        reason: format!("union role '{}' includes no roles", name),
                    });
                }
                let members = includes
                    .iter()
                    .map(|included| self.earlier(name, included).cloned())
                    .collect::<WardenResult<Vec<_>>>()?;
                Role::any_of(members)
            }
            RoleKind::Management {
                manages,
                operations,
                recursive,
            } => {
                if operations.is_empty() {
                    return Err(WardenError::ConfigError {
                        reason: format!("management role '{}' lists no operations", name),
                    });
                }
                let level = self.earlier(name, &manages)?.clone();
                if recursive {
                    Role::recursive_manager(level, operations)
                } else {
                    Role::manager(level, operations)
                }
            }
        };
        Ok(role)
    }

    /// A role referenced by `referrer`, which must already be declared.
    fn earlier(&self, referrer: &str, name: &str) -> WardenResult<&Role> {
        self.entries
            .get(name)
            .map(|e| &e.role)
            .ok_or_else(|| WardenError::ConfigError {
                reason: format!(
                    "role '{}' refers to '{}', which is not declared before it",
                    referrer, name
                ),
            })
    }
}

fn require_operations(name: &str, operations: &[String]) -> WardenResult<()> {
    if operations.is_empty() {
        return Err(WardenError::ConfigError {
            reason: format!("role '{}' lists no operations", name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissible::{ManagementOperation, Permissible};

    const CATALOG: &str = r#"
        [[roles]]
        name = "reader"
        description = "Reads published documents"
        kind = "resource"
        resource = "/docs/published"
        operations = ["read"]

        [[roles]]
        name = "writer"
        kind = "operations"
        operations = ["write", "delete"]
        exclude = ["delete"]

        [[roles]]
        name = "staff"
        kind = "union"
        includes = ["reader", "writer"]

        [[roles]]
        name = "hr"
        kind = "management"
        manages = "staff"
        operations = ["grant", "revoke"]
        recursive = true

        [[roles]]
        name = "root"
        kind = "superuser"

        [[roles]]
        name = "guest"
        kind = "none"
    "#;

    fn docs(path: &str) -> Resource {
        Resource::parse(path).unwrap()
    }

    #[test]
    fn loads_every_kind_in_declaration_order() {
        let catalog = RoleCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["reader", "writer", "staff", "hr", "root", "guest"]
        );
        assert_eq!(catalog.description("reader"), Some("Reads published documents"));
        assert_eq!(catalog.role("root").unwrap(), &Role::SuperUser);
        assert_eq!(catalog.role("guest").unwrap(), &Role::NoRole);
    }

    #[test]
    fn resolved_roles_answer_queries() {
        let catalog = RoleCatalog::from_toml_str(CATALOG).unwrap();
        let reader = catalog.role("reader").unwrap();
        assert!(reader.can(&Permissible::access(docs("/docs/published/a"), "read")));
        assert!(!reader.can(&Permissible::access(docs("/docs/drafts/a"), "read")));

        let writer = catalog.role("writer").unwrap();
        assert!(writer.can(&Permissible::operation("write")));
        assert!(!writer.can(&Permissible::operation("delete")));

        let staff = catalog.role("staff").unwrap();
        assert!(matches!(staff, Role::Roles(_)));

        let hr = catalog.role("hr").unwrap();
        assert!(hr.can(&Permissible::manage_role(reader.clone(), ManagementOperation::Grant)));
        assert!(!hr.can(&Permissible::manage_role(
            reader.clone(),
            ManagementOperation::Retrieve
        )));
    }

    #[test]
    fn sample_catalog_loads() {
        let catalog = RoleCatalog::from_toml_str(include_str!("../../../demo/catalog.toml")).unwrap();
        let hr = catalog.role("hr").unwrap();
        let lead = catalog.role("team-lead").unwrap();
        assert!(hr.can(&Permissible::manage_role(lead.clone(), ManagementOperation::Grant)));
        assert!(!lead.can(&Permissible::manage_role(lead.clone(), ManagementOperation::Grant)));
        assert!(!catalog
            .role("operator")
            .unwrap()
            .can(&Permissible::operation("shutdown")));
    }

    #[test]
    fn unknown_role_lookup_is_config_error() {
        let catalog = RoleCatalog::from_toml_str(CATALOG).unwrap();
        let err = catalog.role("nobody").unwrap_err();
        assert!(matches!(err, WardenError::ConfigError { .. }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = RoleCatalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
    }

    // ── Rejected input ────────────────────────────────────────────────────────

    fn rejects(toml: &str, needle: &str) {
        match RoleCatalog::from_toml_str(toml) {
            Err(WardenError::ConfigError { reason }) => assert!(
                reason.contains(needle),
                "expected '{needle}' in '{reason}'"
            ),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        rejects("[[roles]\nname = ", "failed to parse");
    }

    #[test]
    fn rejects_unknown_kind() {
        rejects("[[roles]]\nname = \"x\"\nkind = \"wizard\"", "failed to parse");
    }

    #[test]
    fn rejects_unknown_management_operation() {
        rejects(
            r#"
            [[roles]]
            name = "a"
            kind = "superuser"

            [[roles]]
            name = "m"
            kind = "management"
            manages = "a"
            operations = ["destroy"]
            "#,
            "failed to parse",
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        rejects(
            "[[roles]]\nname = \"a\"\nkind = \"none\"\n[[roles]]\nname = \"a\"\nkind = \"superuser\"",
            "more than once",
        );
    }

    #[test]
    fn rejects_forward_references() {
        rejects(
            r#"
            [[roles]]
            name = "both"
            kind = "union"
            includes = ["later"]

            [[roles]]
            name = "later"
            kind = "none"
            "#,
            "not declared before it",
        );
    }

    #[test]
    fn rejects_relative_resource_paths() {
        rejects(
            "[[roles]]\nname = \"r\"\nkind = \"resource\"\nresource = \"docs\"\noperations = [\"read\"]",
            "invalid resource",
        );
    }

    #[test]
    fn rejects_empty_operation_lists() {
        rejects(
            "[[roles]]\nname = \"r\"\nkind = \"operations\"\noperations = []",
            "lists no operations",
        );
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = RoleCatalog::from_file(Path::new("/nonexistent/warden/catalog.toml")).unwrap_err();
        assert!(matches!(err, WardenError::ConfigError { .. }));
    }
}
