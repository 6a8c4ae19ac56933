//! `mzgrant default-privileges` commands.
//!
//! Default privileges are keyed by object type, grantee, target role and an
//! optional database or schema. A key with target PUBLIC applies to objects
//! created by any role.

use anyhow::{Context, Result};
use clap::Args;
use mzgrant_catalog::{AclStore, DefaultKey, GrantInspector, IdResolver};
use mzgrant_core::ObjectType;
use mzgrant_core::role::PUBLIC_ROLE_NAME;
use mzgrant_privilege::DefaultPrivilegeGrant;
use serde_json::json;

use super::{keywords, print_json};

#[derive(Args, Debug, Clone)]
pub struct DefaultKeyArgs {
    /// Object type (TABLE, TYPE, SECRET, CONNECTION, DATABASE, SCHEMA or CLUSTER)
    #[arg(long = "type", value_name = "TYPE")]
    pub object_type: ObjectType,

    /// Role receiving the privilege (PUBLIC for everyone)
    #[arg(long)]
    pub grantee: String,

    /// Role whose future objects are covered (PUBLIC for all roles)
    #[arg(long, default_value = PUBLIC_ROLE_NAME)]
    pub target_role: String,

    /// Limit to objects created in this database
    #[arg(long)]
    pub database: Option<String>,

    /// Limit to objects created in this schema
    #[arg(long, requires = "database")]
    pub schema: Option<String>,
}

impl DefaultKeyArgs {
    fn to_key(&self) -> DefaultKey<'_> {
        DefaultKey {
            object_type: self.object_type,
            grantee_name: &self.grantee,
            target_role_name: &self.target_role,
            database_name: self.database.as_deref(),
            schema_name: self.schema.as_deref(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DefaultGrantArgs {
    #[command(flatten)]
    pub key: DefaultKeyArgs,

    /// Privilege keyword, e.g. SELECT or USAGE
    #[arg(long)]
    pub privilege: String,
}

impl DefaultGrantArgs {
    pub fn to_grant(&self) -> Result<DefaultPrivilegeGrant> {
        let key = &self.key;
        let grant = DefaultPrivilegeGrant::new(
            key.object_type,
            &key.grantee,
            &key.target_role,
            &self.privilege,
        )?;
        Ok(match (&key.database, &key.schema) {
            (Some(database), Some(schema)) => grant.in_schema(database, schema),
            (Some(database), None) => grant.in_database(database),
            _ => grant,
        })
    }
}

pub async fn show<C>(inspector: &GrantInspector<C>, args: &DefaultKeyArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let rows = inspector.default_privileges(&args.to_key()).await?;

    if json {
        return print_json(&rows);
    }

    println!(
        "Default privileges on {} for {} (objects created by {}):",
        args.object_type.plural(),
        args.grantee,
        args.target_role
    );
    if rows.is_empty() {
        println!("   (none)");
    }
    for row in &rows {
        println!("   {}", keywords(&row.privileges));
    }
    Ok(())
}

pub async fn grant<C>(inspector: &GrantInspector<C>, args: &DefaultGrantArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let grant = args.to_grant()?;
    let id = inspector
        .apply_default(&grant)
        .await
        .context("Failed to alter default privileges")?;

    if json {
        return print_json(&json!({ "id": id.to_string(), "grant": id }));
    }
    println!(
        "✔ {} now receives {} on new {}",
        grant.grantee_name,
        grant.privilege,
        grant.object_type.plural()
    );
    println!("  id: {}", id);
    Ok(())
}

pub async fn revoke<C>(inspector: &GrantInspector<C>, args: &DefaultGrantArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let grant = args.to_grant()?;
    let revoked = inspector
        .revoke_default(&grant)
        .await
        .context("Failed to alter default privileges")?;

    if json {
        return print_json(&json!({ "revoked": revoked }));
    }
    if revoked {
        println!(
            "✔ {} no longer receives {} on new {}",
            grant.grantee_name,
            grant.privilege,
            grant.object_type.plural()
        );
    } else {
        println!("• default privilege was not present");
    }
    Ok(())
}
