//! Desired grants, expressed by name.
//!
//! These are what a caller asks for: "role R should hold SELECT on table T".
//! Names are resolved to catalog ids only when the grant is checked.

use mzgrant_core::{ObjectIdentity, ObjectType};
use serde::{Deserialize, Serialize};

use crate::error::PrivilegeError;
use crate::privilege::{Privilege, validate_default_privilege, validate_privilege};

/// A privilege on one object for one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectGrant {
    pub object: ObjectIdentity,
    pub role_name: String,
    pub privilege: Privilege,
}

impl ObjectGrant {
    /// Build a grant, checking the privilege is legal on the object type.
    pub fn new(
        object: ObjectIdentity,
        role_name: impl Into<String>,
        privilege: &str,
    ) -> Result<Self, PrivilegeError> {
        let privilege = validate_privilege(object.object_type, privilege)?;
        Ok(Self {
            object,
            role_name: role_name.into(),
            privilege,
        })
    }
}

/// A default privilege: what `grantee_name` receives on objects of
/// `object_type` that `target_role_name` creates in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefaultPrivilegeGrant {
    pub object_type: ObjectType,
    pub grantee_name: String,
    pub target_role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    pub privilege: Privilege,
}

impl DefaultPrivilegeGrant {
    pub fn new(
        object_type: ObjectType,
        grantee_name: impl Into<String>,
        target_role_name: impl Into<String>,
        privilege: &str,
    ) -> Result<Self, PrivilegeError> {
        Ok(Self {
            object_type,
            grantee_name: grantee_name.into(),
            target_role_name: target_role_name.into(),
            database_name: None,
            schema_name: None,
            privilege: validate_default_privilege(object_type, privilege)?,
        })
    }

    /// Limit the default privilege to objects created in `database`.
    pub fn in_database(mut self, database: impl Into<String>) -> Self {
        self.database_name = Some(database.into());
        self
    }

    /// Limit the default privilege to objects created in `database.schema`.
    pub fn in_schema(mut self, database: impl Into<String>, schema: impl Into<String>) -> Self {
        self.database_name = Some(database.into());
        self.schema_name = Some(schema.into());
        self
    }
}
