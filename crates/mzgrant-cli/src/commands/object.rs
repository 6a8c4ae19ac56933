//! Object privilege commands.
//!
//! `mzgrant show` - Every privilege held on an object, by role id.
//! `mzgrant check` - Whether one role holds one privilege.
//! `mzgrant grant` / `mzgrant revoke` - Idempotent grant and revoke.

use anyhow::{Context, Result};
use clap::Args;
use mzgrant_catalog::{AclStore, GrantInspector, IdResolver};
use mzgrant_core::{ObjectIdentity, ObjectType};
use mzgrant_privilege::ObjectGrant;
use serde_json::json;

use super::{keywords, print_json};

/// Names one object.
#[derive(Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Object type (DATABASE, SCHEMA, TABLE, VIEW, MATERIALIZED VIEW, SOURCE,
    /// CONNECTION, SECRET, TYPE, CLUSTER or SYSTEM)
    #[arg(long = "type", value_name = "TYPE")]
    pub object_type: ObjectType,

    /// Object name (omit for SYSTEM)
    #[arg(long)]
    pub name: Option<String>,

    /// Schema containing the object
    #[arg(long)]
    pub schema: Option<String>,

    /// Database containing the object or schema
    #[arg(long)]
    pub database: Option<String>,
}

impl ObjectArgs {
    pub fn to_identity(&self) -> Result<ObjectIdentity> {
        if self.object_type == ObjectType::System {
            return Ok(ObjectIdentity::system());
        }
        let name = self
            .name
            .clone()
            .with_context(|| format!("--name is required for {}", self.object_type))?;
        Ok(ObjectIdentity::new(
            self.object_type,
            name,
            self.schema.clone(),
            self.database.clone(),
        )?)
    }
}

/// Names one privilege on one object for one role.
#[derive(Args, Debug, Clone)]
pub struct GrantArgs {
    #[command(flatten)]
    pub object: ObjectArgs,

    /// Role receiving the privilege (PUBLIC for everyone)
    #[arg(long)]
    pub role: String,

    /// Privilege keyword, e.g. SELECT or USAGE
    #[arg(long)]
    pub privilege: String,
}

impl GrantArgs {
    pub fn to_grant(&self) -> Result<ObjectGrant> {
        Ok(ObjectGrant::new(
            self.object.to_identity()?,
            &self.role,
            &self.privilege,
        )?)
    }
}

pub async fn show<C>(inspector: &GrantInspector<C>, args: &ObjectArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let object = args.to_identity()?;
    let privileges = inspector.object_privileges(&object).await?;

    if json {
        return print_json(&json!({
            "object": object,
            "privileges": privileges,
        }));
    }

    println!("{}", object);
    if privileges.is_empty() {
        println!("   (no privileges granted)");
    }
    for (role, held) in privileges.iter() {
        println!("   {:<12} {}", role.to_string(), keywords(held));
    }
    Ok(())
}

/// Returns whether the privilege is held.
pub async fn check<C>(inspector: &GrantInspector<C>, args: &GrantArgs, json: bool) -> Result<bool>
where
    C: IdResolver + AclStore,
{
    let grant = args.to_grant()?;
    let check = inspector.check(&grant).await?;
    let present = check.status.is_present();

    if json {
        print_json(&check)?;
    } else if present {
        println!("✔ {} holds {} on {}", grant.role_name, grant.privilege, grant.object);
        println!("  id: {}", check.id);
    } else {
        println!("✘ {} does not hold {} on {}", grant.role_name, grant.privilege, grant.object);
    }
    Ok(present)
}

pub async fn grant<C>(inspector: &GrantInspector<C>, args: &GrantArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let grant = args.to_grant()?;
    let id = inspector
        .apply(&grant)
        .await
        .with_context(|| format!("Failed to grant {} on {}", grant.privilege, grant.object))?;

    if json {
        return print_json(&json!({ "id": id.to_string(), "grant": id }));
    }
    println!("✔ Granted {} on {} to {}", grant.privilege, grant.object, grant.role_name);
    println!("  id: {}", id);
    Ok(())
}

pub async fn revoke<C>(inspector: &GrantInspector<C>, args: &GrantArgs, json: bool) -> Result<()>
where
    C: IdResolver + AclStore,
{
    let grant = args.to_grant()?;
    let revoked = inspector
        .revoke(&grant)
        .await
        .with_context(|| format!("Failed to revoke {} on {}", grant.privilege, grant.object))?;

    if json {
        return print_json(&json!({ "revoked": revoked }));
    }
    if revoked {
        println!("✔ Revoked {} on {} from {}", grant.privilege, grant.object, grant.role_name);
    } else {
        println!("• {} did not hold {} on {}", grant.role_name, grant.privilege, grant.object);
    }
    Ok(())
}
