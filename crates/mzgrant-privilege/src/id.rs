//! Stable identifiers for grants.
//!
//! Two formats exist and never overlap:
//!
//! - object grant: `GRANT|<OBJECT TYPE>|<object id>|<role id>|<PRIVILEGE>`
//! - default-privilege grant:
//!   `GRANT DEFAULT|<OBJECT TYPE>|<grantee id>|<target id>|<database id>|<schema id>|<PRIVILEGE>`
//!   where the database and schema segments are empty when unscoped.
//!
//! Identifiers are persisted by callers and used to re-read state, so both
//! formats are fixed.

use mzgrant_core::{ObjectId, ObjectType, RoleId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::IdError;
use crate::privilege::{Privilege, validate_default_privilege, validate_privilege};

pub const GRANT_ID_PATTERN: &str = r"^GRANT\|(?P<object_type>[A-Z]+(?: [A-Z]+)?)\|(?P<object_id>[^|]*)\|(?P<role_id>[^|]+)\|(?P<privilege>[A-Z]+)$";

pub const GRANT_DEFAULT_ID_PATTERN: &str = r"^GRANT DEFAULT\|(?P<object_type>[A-Z]+(?: [A-Z]+)?)\|(?P<grantee_id>[^|]+)\|(?P<target_id>[^|]+)\|(?P<database_id>[^|]*)\|(?P<schema_id>[^|]*)\|(?P<privilege>[A-Z]+)$";

static GRANT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GRANT_ID_PATTERN).expect("grant id pattern compiles"));

static GRANT_DEFAULT_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(GRANT_DEFAULT_ID_PATTERN).expect("default grant id pattern compiles")
});

/// Which identifier format a string uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Grant,
    DefaultGrant,
}

/// Classify an identifier without fully parsing it.
pub fn id_kind(id: &str) -> Option<IdKind> {
    if GRANT_ID_REGEX.is_match(id) {
        Some(IdKind::Grant)
    } else if GRANT_DEFAULT_ID_REGEX.is_match(id) {
        Some(IdKind::DefaultGrant)
    } else {
        None
    }
}

/// Identifies one privilege granted to one role on one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId {
    pub object_type: ObjectType,
    /// Empty for [`ObjectType::System`].
    pub object_id: ObjectId,
    pub role_id: RoleId,
    pub privilege: Privilege,
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GRANT|{}|{}|{}|{}",
            self.object_type, self.object_id, self.role_id, self.privilege
        )
    }
}

impl FromStr for GrantId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = GRANT_ID_REGEX
            .captures(s)
            .ok_or_else(|| IdError::Malformed(s.to_string()))?;
        let object_type: ObjectType = caps["object_type"].parse()?;
        let object_id = &caps["object_id"];
        if object_id.is_empty() != (object_type == ObjectType::System) {
            return Err(IdError::Malformed(s.to_string()));
        }
        Ok(Self {
            object_type,
            object_id: ObjectId::new(object_id),
            role_id: RoleId::new(&caps["role_id"]),
            privilege: validate_privilege(object_type, &caps["privilege"])?,
        })
    }
}

/// Identifies one default privilege: what `grantee` receives on objects of
/// `object_type` created in the future by `target`, optionally limited to a
/// database or schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefaultGrantId {
    pub object_type: ObjectType,
    pub grantee_id: RoleId,
    pub target_id: RoleId,
    pub database_id: Option<ObjectId>,
    pub schema_id: Option<ObjectId>,
    pub privilege: Privilege,
}

impl fmt::Display for DefaultGrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GRANT DEFAULT|{}|{}|{}|{}|{}|{}",
            self.object_type,
            self.grantee_id,
            self.target_id,
            self.database_id.as_ref().map(ObjectId::as_str).unwrap_or(""),
            self.schema_id.as_ref().map(ObjectId::as_str).unwrap_or(""),
            self.privilege
        )
    }
}

impl FromStr for DefaultGrantId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = GRANT_DEFAULT_ID_REGEX
            .captures(s)
            .ok_or_else(|| IdError::Malformed(s.to_string()))?;
        let object_type: ObjectType = caps["object_type"].parse()?;
        let optional = |name: &str| {
            let value = &caps[name];
            (!value.is_empty()).then(|| ObjectId::new(value))
        };
        Ok(Self {
            object_type,
            grantee_id: RoleId::new(&caps["grantee_id"]),
            target_id: RoleId::new(&caps["target_id"]),
            database_id: optional("database_id"),
            schema_id: optional("schema_id"),
            privilege: validate_default_privilege(object_type, &caps["privilege"])?,
        })
    }
}
