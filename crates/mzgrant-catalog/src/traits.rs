//! Seams between privilege logic and the database.
//!
//! [`IdResolver`] turns names into catalog ids; [`AclStore`] reads and
//! changes privilege state. Both are implemented against a live instance by
//! [`crate::MaterializeCatalog`] and in memory by [`crate::MemoryCatalog`].

use async_trait::async_trait;
use mzgrant_core::{ObjectId, ObjectIdentity, ObjectType, RoleId};
use mzgrant_privilege::{
    Action, DefaultPrivilege, DefaultPrivilegeFilter, DefaultPrivilegeGrant, ObjectGrant,
};

use crate::error::Result;

/// Resolves role and object names to catalog ids.
///
/// Lookups are exact and case-sensitive. A name with no matching row fails
/// with [`crate::CatalogError::NotFound`]; the same name resolves to the same
/// id for as long as the object exists.
#[async_trait]
pub trait IdResolver: Send + Sync {
    /// Resolve a role name. `PUBLIC` resolves to the PUBLIC pseudo-role.
    async fn role_id(&self, name: &str) -> Result<RoleId>;

    /// Resolve an object identity. The SYSTEM object has an empty id.
    async fn object_id(&self, object: &ObjectIdentity) -> Result<ObjectId>;
}

/// Reads and changes privilege state.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// The object's raw ACL text; empty when it has no explicit grants.
    async fn scan_privileges(&self, object_type: ObjectType, id: &ObjectId) -> Result<String>;

    /// Default-privilege rows matching the filter; zero or one in practice.
    async fn scan_default_privileges(
        &self,
        filter: &DefaultPrivilegeFilter,
    ) -> Result<Vec<DefaultPrivilege>>;

    /// Grant or revoke a privilege on an object.
    async fn apply_grant(&self, action: Action, grant: &ObjectGrant) -> Result<()>;

    /// Grant or revoke a default privilege.
    async fn apply_default_grant(&self, action: Action, grant: &DefaultPrivilegeGrant)
    -> Result<()>;
}
