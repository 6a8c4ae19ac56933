//! Role and object ids.
//!
//! The catalog identifies roles and objects by short textual surrogate keys
//! (`u1` for user objects, `s3` for system objects, `p` for PUBLIC). They are
//! opaque and compared case-sensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the pseudo-role every role is a member of.
pub const PUBLIC_ROLE_NAME: &str = "PUBLIC";

/// Id the catalog uses for the PUBLIC pseudo-role.
pub const PUBLIC_ROLE_ID: &str = "p";

/// Catalog id of a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn public() -> Self {
        Self(PUBLIC_ROLE_ID.to_string())
    }

    pub fn is_public(&self) -> bool {
        self.0 == PUBLIC_ROLE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Catalog id of a database object (database, schema, cluster, table, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Whether a role name refers to the PUBLIC pseudo-role.
///
/// PUBLIC is a keyword, so the match ignores case.
pub fn is_public_role_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(PUBLIC_ROLE_NAME)
}
