//! Privilege kinds and which object types accept them.

use mzgrant_core::ObjectType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PrivilegeError;

/// A single privilege, encoded in ACLs as one character.
///
/// Variant order is the canonical flag order used when encoding (`arwdUCRBN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Privilege {
    Insert,
    Select,
    Update,
    Delete,
    Usage,
    Create,
    CreateRole,
    CreateDb,
    CreateCluster,
}

impl Privilege {
    pub const ALL: [Privilege; 9] = [
        Privilege::Insert,
        Privilege::Select,
        Privilege::Update,
        Privilege::Delete,
        Privilege::Usage,
        Privilege::Create,
        Privilege::CreateRole,
        Privilege::CreateDb,
        Privilege::CreateCluster,
    ];

    /// Single-character ACL code.
    pub fn code(&self) -> char {
        match self {
            Privilege::Insert => 'a',
            Privilege::Select => 'r',
            Privilege::Update => 'w',
            Privilege::Delete => 'd',
            Privilege::Usage => 'U',
            Privilege::Create => 'C',
            Privilege::CreateRole => 'R',
            Privilege::CreateDb => 'B',
            Privilege::CreateCluster => 'N',
        }
    }

    /// SQL keyword, as written in `GRANT <keyword> ON ...`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Privilege::Insert => "INSERT",
            Privilege::Select => "SELECT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::Usage => "USAGE",
            Privilege::Create => "CREATE",
            Privilege::CreateRole => "CREATEROLE",
            Privilege::CreateDb => "CREATEDB",
            Privilege::CreateCluster => "CREATECLUSTER",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Privilege::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Privilege::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Privilege {
    type Err = PrivilegeError;

    /// Parses user input; unlike [`Privilege::from_keyword`] this ignores case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Privilege::from_keyword(&s.trim().to_ascii_uppercase())
            .ok_or_else(|| PrivilegeError::UnknownPrivilege(s.to_string()))
    }
}

/// Privileges that may be granted on an object type.
pub fn object_privileges(object_type: ObjectType) -> &'static [Privilege] {
    use Privilege::*;
    match object_type {
        ObjectType::Database | ObjectType::Schema | ObjectType::Cluster => &[Usage, Create],
        ObjectType::Table => &[Insert, Select, Update, Delete],
        ObjectType::View | ObjectType::MaterializedView | ObjectType::Source => &[Select],
        ObjectType::Type | ObjectType::Connection | ObjectType::Secret => &[Usage],
        ObjectType::System => &[CreateRole, CreateDb, CreateCluster],
    }
}

/// Resolve a privilege keyword and check it is legal on `object_type`.
pub fn validate_privilege(
    object_type: ObjectType,
    keyword: &str,
) -> Result<Privilege, PrivilegeError> {
    let privilege: Privilege = keyword.parse()?;
    let allowed = object_privileges(object_type);
    if allowed.contains(&privilege) {
        return Ok(privilege);
    }
    Err(PrivilegeError::NotApplicable {
        privilege: privilege.keyword().to_string(),
        object_type,
        allowed: allowed
            .iter()
            .map(Privilege::keyword)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Like [`validate_privilege`], additionally requiring that the type accepts
/// `ALTER DEFAULT PRIVILEGES`.
pub fn validate_default_privilege(
    object_type: ObjectType,
    keyword: &str,
) -> Result<Privilege, PrivilegeError> {
    if !object_type.supports_default_privileges() {
        return Err(PrivilegeError::DefaultPrivilegesUnsupported(object_type));
    }
    validate_privilege(object_type, keyword)
}
