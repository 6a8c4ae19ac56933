//! Default privileges as read back from the catalog.

use mzgrant_core::{ObjectId, ObjectType, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::acl::has_privilege;
use crate::id::DefaultGrantId;
use crate::privilege::Privilege;

/// One row of the default-privilege catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPrivilege {
    pub object_type: ObjectType,
    pub grantee_id: RoleId,
    pub target_id: RoleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<ObjectId>,
    pub privileges: BTreeSet<Privilege>,
}

impl DefaultPrivilege {
    pub fn has_privilege(&self, keyword: &str) -> bool {
        has_privilege(Some(&self.privileges), keyword)
    }

    /// The identifier of this row's grant of `privilege`.
    pub fn grant_id(&self, privilege: Privilege) -> DefaultGrantId {
        DefaultGrantId {
            object_type: self.object_type,
            grantee_id: self.grantee_id.clone(),
            target_id: self.target_id.clone(),
            database_id: self.database_id.clone(),
            schema_id: self.schema_id.clone(),
            privilege,
        }
    }
}

/// Selects the default-privilege row for one
/// `(object type, grantee, target, database, schema)` key.
///
/// Absent database/schema match only rows that are themselves unscoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPrivilegeFilter {
    pub object_type: ObjectType,
    pub grantee_id: RoleId,
    pub target_id: RoleId,
    pub database_id: Option<ObjectId>,
    pub schema_id: Option<ObjectId>,
}

impl DefaultPrivilegeFilter {
    pub fn matches(&self, row: &DefaultPrivilege) -> bool {
        self.object_type == row.object_type
            && self.grantee_id == row.grantee_id
            && self.target_id == row.target_id
            && self.database_id == row.database_id
            && self.schema_id == row.schema_id
    }
}

impl From<&DefaultGrantId> for DefaultPrivilegeFilter {
    fn from(id: &DefaultGrantId) -> Self {
        Self {
            object_type: id.object_type,
            grantee_id: id.grantee_id.clone(),
            target_id: id.target_id.clone(),
            database_id: id.database_id.clone(),
            schema_id: id.schema_id.clone(),
        }
    }
}
