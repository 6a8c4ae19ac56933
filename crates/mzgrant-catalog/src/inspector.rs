//! Grant lifecycle on top of a catalog: resolve, read back, apply, revoke.
//!
//! The inspector never trusts what it wrote. Every check re-resolves names,
//! rescans the ACL and re-parses it, so drift made directly in SQL is seen
//! on the next check.

use mzgrant_core::{ObjectIdentity, ObjectType};
use mzgrant_privilege::{
    Action, DefaultGrantId, DefaultPrivilege, DefaultPrivilegeFilter, DefaultPrivilegeGrant,
    GrantId, GrantPlan, ObjectGrant, PrivilegeMap, parse_privileges, plan_default_grant,
    plan_grant,
};
use serde::Serialize;

use crate::error::Result;
use crate::traits::{AclStore, IdResolver};

/// Whether a wanted privilege is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    Present,
    Absent,
}

impl GrantStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, GrantStatus::Present)
    }
}

impl From<GrantPlan> for GrantStatus {
    fn from(plan: GrantPlan) -> Self {
        if plan.is_empty() {
            GrantStatus::Present
        } else {
            GrantStatus::Absent
        }
    }
}

/// Result of checking an object grant.
#[derive(Debug, Clone, Serialize)]
pub struct GrantCheck {
    pub id: GrantId,
    pub status: GrantStatus,
    /// Every privilege currently held on the object.
    pub privileges: PrivilegeMap,
}

/// Result of checking a default-privilege grant.
#[derive(Debug, Clone, Serialize)]
pub struct DefaultGrantCheck {
    pub id: DefaultGrantId,
    pub status: GrantStatus,
    pub rows: Vec<DefaultPrivilege>,
}

/// Names identifying one default-privilege row, before resolution.
#[derive(Debug, Clone, Copy)]
pub struct DefaultKey<'a> {
    pub object_type: ObjectType,
    pub grantee_name: &'a str,
    pub target_role_name: &'a str,
    pub database_name: Option<&'a str>,
    pub schema_name: Option<&'a str>,
}

impl<'a> From<&'a DefaultPrivilegeGrant> for DefaultKey<'a> {
    fn from(grant: &'a DefaultPrivilegeGrant) -> Self {
        Self {
            object_type: grant.object_type,
            grantee_name: &grant.grantee_name,
            target_role_name: &grant.target_role_name,
            database_name: grant.database_name.as_deref(),
            schema_name: grant.schema_name.as_deref(),
        }
    }
}

pub struct GrantInspector<C> {
    catalog: C,
}

impl<C: IdResolver + AclStore> GrantInspector<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Current privileges on an object, by grantee.
    pub async fn object_privileges(&self, object: &ObjectIdentity) -> Result<PrivilegeMap> {
        let id = self.catalog.object_id(object).await?;
        let raw = self.catalog.scan_privileges(object.object_type, &id).await?;
        Ok(parse_privileges(&raw)?)
    }

    /// Resolve a grant's names to its stable identifier.
    pub async fn resolve(&self, grant: &ObjectGrant) -> Result<GrantId> {
        Ok(GrantId {
            object_type: grant.object.object_type,
            object_id: self.catalog.object_id(&grant.object).await?,
            role_id: self.catalog.role_id(&grant.role_name).await?,
            privilege: grant.privilege,
        })
    }

    pub async fn check(&self, grant: &ObjectGrant) -> Result<GrantCheck> {
        let id = self.resolve(grant).await?;
        self.read(id).await
    }

    /// Re-read a grant from its identifier alone.
    pub async fn read(&self, id: GrantId) -> Result<GrantCheck> {
        let raw = self
            .catalog
            .scan_privileges(id.object_type, &id.object_id)
            .await?;
        let privileges = parse_privileges(&raw)?;
        let status = plan_grant(&id.role_id, id.privilege, &privileges).into();
        tracing::debug!(grant = %id, ?status, "checked grant");
        Ok(GrantCheck {
            id,
            status,
            privileges,
        })
    }

    /// Grant if absent; returns the identifier of the now-present grant.
    pub async fn apply(&self, grant: &ObjectGrant) -> Result<GrantId> {
        let check = self.check(grant).await?;
        if check.status.is_present() {
            tracing::info!(grant = %check.id, "grant already present");
            return Ok(check.id);
        }
        self.catalog.apply_grant(Action::Grant, grant).await?;
        Ok(check.id)
    }

    /// Revoke if present. Returns whether a statement was issued.
    pub async fn revoke(&self, grant: &ObjectGrant) -> Result<bool> {
        let check = self.check(grant).await?;
        if !check.status.is_present() {
            tracing::info!(grant = %check.id, "grant already absent");
            return Ok(false);
        }
        self.catalog.apply_grant(Action::Revoke, grant).await?;
        Ok(true)
    }

    pub async fn resolve_default(&self, grant: &DefaultPrivilegeGrant) -> Result<DefaultGrantId> {
        let filter = self.resolve_default_key(&DefaultKey::from(grant)).await?;
        Ok(DefaultGrantId {
            object_type: filter.object_type,
            grantee_id: filter.grantee_id,
            target_id: filter.target_id,
            database_id: filter.database_id,
            schema_id: filter.schema_id,
            privilege: grant.privilege,
        })
    }

    /// Resolve the names in a default-privilege key to catalog ids.
    pub async fn resolve_default_key(&self, key: &DefaultKey<'_>) -> Result<DefaultPrivilegeFilter> {
        let database_id = match key.database_name {
            Some(database) => Some(
                self.catalog
                    .object_id(&ObjectIdentity::database(database)?)
                    .await?,
            ),
            None => None,
        };
        let schema_id = match key.schema_name {
            Some(schema) => {
                let identity = ObjectIdentity::new(
                    ObjectType::Schema,
                    schema,
                    None,
                    key.database_name.map(str::to_string),
                )?;
                Some(self.catalog.object_id(&identity).await?)
            }
            None => None,
        };

        Ok(DefaultPrivilegeFilter {
            object_type: key.object_type,
            grantee_id: self.catalog.role_id(key.grantee_name).await?,
            target_id: self.catalog.role_id(key.target_role_name).await?,
            database_id,
            schema_id,
        })
    }

    /// The default-privilege rows stored under `key`.
    pub async fn default_privileges(&self, key: &DefaultKey<'_>) -> Result<Vec<DefaultPrivilege>> {
        let filter = self.resolve_default_key(key).await?;
        self.catalog.scan_default_privileges(&filter).await
    }

    pub async fn check_default(&self, grant: &DefaultPrivilegeGrant) -> Result<DefaultGrantCheck> {
        let id = self.resolve_default(grant).await?;
        self.read_default(id).await
    }

    pub async fn read_default(&self, id: DefaultGrantId) -> Result<DefaultGrantCheck> {
        let rows = self
            .catalog
            .scan_default_privileges(&DefaultPrivilegeFilter::from(&id))
            .await?;
        let status = plan_default_grant(id.privilege, &rows).into();
        tracing::debug!(grant = %id, ?status, "checked default privilege");
        Ok(DefaultGrantCheck { id, status, rows })
    }

    pub async fn apply_default(&self, grant: &DefaultPrivilegeGrant) -> Result<DefaultGrantId> {
        let check = self.check_default(grant).await?;
        if check.status.is_present() {
            tracing::info!(grant = %check.id, "default privilege already present");
            return Ok(check.id);
        }
        self.catalog
            .apply_default_grant(Action::Grant, grant)
            .await?;
        Ok(check.id)
    }

    pub async fn revoke_default(&self, grant: &DefaultPrivilegeGrant) -> Result<bool> {
        let check = self.check_default(grant).await?;
        if !check.status.is_present() {
            tracing::info!(grant = %check.id, "default privilege already absent");
            return Ok(false);
        }
        self.catalog
            .apply_default_grant(Action::Revoke, grant)
            .await?;
        Ok(true)
    }
}
