//! `mzgrant plan` - compare wanted grants with the live catalog.
//!
//! The input file lists grants by name:
//!
//! ```yaml
//! grants:
//!   - object: { object_type: TABLE, database_name: materialize, schema_name: public, name: orders }
//!     role_name: analyst
//!     privilege: SELECT
//! default_privileges:
//!   - object_type: TYPE
//!     grantee_name: analyst
//!     target_role_name: PUBLIC
//!     privilege: USAGE
//! ```
//!
//! Nothing is changed; the output says which entries are already in place and
//! which would need a GRANT.

use anyhow::{Context, Result};
use mzgrant_catalog::{AclStore, GrantInspector, IdResolver};
use mzgrant_privilege::{
    DefaultPrivilegeGrant, GrantPlan, ObjectGrant, validate_default_privilege, validate_privilege,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The wanted state, by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wanted {
    #[serde(default)]
    pub grants: Vec<ObjectGrant>,
    #[serde(default)]
    pub default_privileges: Vec<DefaultPrivilegeGrant>,
}

impl Wanted {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid plan file {:?}", path))
    }

    /// Parse and validate every entry. Object identities are scope-checked
    /// while deserializing; privileges are checked against their object type.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let wanted: Wanted = serde_yaml::from_str(content)?;
        for grant in &wanted.grants {
            validate_privilege(grant.object.object_type, grant.privilege.keyword())?;
        }
        for grant in &wanted.default_privileges {
            validate_default_privilege(grant.object_type, grant.privilege.keyword())?;
        }
        Ok(wanted)
    }
}

/// One line of the plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    pub id: String,
    pub description: String,
    pub action: GrantPlan,
}

pub async fn compute<C>(inspector: &GrantInspector<C>, wanted: &Wanted) -> Result<Vec<PlanEntry>>
where
    C: IdResolver + AclStore,
{
    let mut entries = Vec::new();

    for grant in &wanted.grants {
        let check = inspector
            .check(grant)
            .await
            .with_context(|| format!("Failed to check {} on {}", grant.privilege, grant.object))?;
        entries.push(PlanEntry {
            id: check.id.to_string(),
            description: format!("{} on {} to {}", grant.privilege, grant.object, grant.role_name),
            action: action(check.status.is_present()),
        });
    }

    for grant in &wanted.default_privileges {
        let check = inspector.check_default(grant).await.with_context(|| {
            format!(
                "Failed to check default {} on {}",
                grant.privilege,
                grant.object_type.plural()
            )
        })?;
        entries.push(PlanEntry {
            id: check.id.to_string(),
            description: format!(
                "default {} on {} created by {} to {}",
                grant.privilege,
                grant.object_type.plural(),
                grant.target_role_name,
                grant.grantee_name
            ),
            action: action(check.status.is_present()),
        });
    }

    Ok(entries)
}

fn action(present: bool) -> GrantPlan {
    if present { GrantPlan::NoOp } else { GrantPlan::Grant }
}

/// Print the plan. Returns the number of entries needing a change.
pub async fn run<C>(inspector: &GrantInspector<C>, wanted: &Wanted, json: bool) -> Result<usize>
where
    C: IdResolver + AclStore,
{
    let entries = compute(inspector, wanted).await?;
    let pending = entries.iter().filter(|e| !e.action.is_empty()).count();

    if json {
        super::print_json(&entries)?;
        return Ok(pending);
    }

    for entry in &entries {
        let marker = if entry.action.is_empty() { "✔" } else { "+" };
        println!("{} {}", marker, entry.description);
    }
    println!();
    println!("{} of {} entries would change", pending, entries.len());
    Ok(pending)
}
