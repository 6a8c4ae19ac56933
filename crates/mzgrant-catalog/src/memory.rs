//! In-memory catalog.
//!
//! Satisfies the same contracts as [`crate::MaterializeCatalog`] without a
//! database: ids are handed out on registration, ACLs are stored as raw text
//! and rewritten through the codec on every grant or revoke. Used to test
//! privilege logic in isolation.

use async_trait::async_trait;
use mzgrant_core::role::is_public_role_name;
use mzgrant_core::{ObjectId, ObjectIdentity, ObjectType, RoleId};
use mzgrant_privilege::{
    AclItem, Action, DefaultPrivilege, DefaultPrivilegeFilter, DefaultPrivilegeGrant, ObjectGrant,
    encode_acl, parse_acl_items,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::error::{CatalogError, Result};
use crate::traits::{AclStore, IdResolver};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    roles: HashMap<String, RoleId>,
    objects: HashMap<ObjectIdentity, ObjectId>,
    acls: HashMap<(ObjectType, ObjectId), String>,
    defaults: Vec<DefaultPrivilege>,
}

impl MemoryState {
    fn allocate(&mut self) -> String {
        self.next_id += 1;
        format!("u{}", self.next_id)
    }
}

/// Catalog kept entirely in process memory.
#[derive(Debug)]
pub struct MemoryCatalog {
    /// Role recorded as grantor on every change.
    grantor: RoleId,
    state: Mutex<MemoryState>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            grantor: RoleId::new("s1"),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a role, returning its id. Registering twice returns the same id.
    pub fn create_role(&self, name: &str) -> RoleId {
        let mut state = self.state();
        if let Some(id) = state.roles.get(name) {
            return id.clone();
        }
        let id = RoleId::new(state.allocate());
        state.roles.insert(name.to_string(), id.clone());
        id
    }

    /// Register an object with an empty ACL, returning its id.
    pub fn create_object(&self, object: &ObjectIdentity) -> ObjectId {
        let mut state = self.state();
        if let Some(id) = state.objects.get(object) {
            return id.clone();
        }
        let id = ObjectId::new(state.allocate());
        state.objects.insert(object.clone(), id.clone());
        state
            .acls
            .insert((object.object_type, id.clone()), String::new());
        id
    }

    /// Remove an object; later lookups fail with NotFound.
    pub fn drop_object(&self, object: &ObjectIdentity) {
        let mut state = self.state();
        if let Some(id) = state.objects.remove(object) {
            state.acls.remove(&(object.object_type, id));
        }
    }

    /// Overwrite an object's raw ACL text, bypassing grant statements.
    pub fn set_raw_acl(&self, object_type: ObjectType, id: &ObjectId, raw: impl Into<String>) {
        self.state()
            .acls
            .insert((object_type, id.clone()), raw.into());
    }

    /// Replace every default-privilege row, bypassing grant statements.
    pub fn set_default_privileges(&self, rows: Vec<DefaultPrivilege>) {
        self.state().defaults = rows;
    }

    fn lookup_role(state: &MemoryState, name: &str) -> Result<RoleId> {
        if is_public_role_name(name) {
            return Ok(RoleId::public());
        }
        state
            .roles
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("role", name))
    }

    fn lookup_object(state: &MemoryState, object: &ObjectIdentity) -> Result<ObjectId> {
        if object.object_type == ObjectType::System {
            return Ok(ObjectId::new(""));
        }
        state.objects.get(object).cloned().ok_or_else(|| {
            CatalogError::not_found(object.object_type.as_str(), object.name_parts().join("."))
        })
    }

    fn lookup_scope(
        state: &MemoryState,
        grant: &DefaultPrivilegeGrant,
    ) -> Result<(Option<ObjectId>, Option<ObjectId>)> {
        let database_id = grant
            .database_name
            .as_ref()
            .map(|db| Self::lookup_object(state, &ObjectIdentity::database(db.clone())?))
            .transpose()?;
        let schema_id = grant
            .schema_name
            .as_ref()
            .map(|schema| {
                let identity = ObjectIdentity::new(
                    ObjectType::Schema,
                    schema.clone(),
                    None,
                    grant.database_name.clone(),
                )?;
                Self::lookup_object(state, &identity)
            })
            .transpose()?;
        Ok((database_id, schema_id))
    }
}

#[async_trait]
impl IdResolver for MemoryCatalog {
    async fn role_id(&self, name: &str) -> Result<RoleId> {
        Self::lookup_role(&self.state(), name)
    }

    async fn object_id(&self, object: &ObjectIdentity) -> Result<ObjectId> {
        Self::lookup_object(&self.state(), object)
    }
}

#[async_trait]
impl AclStore for MemoryCatalog {
    async fn scan_privileges(&self, object_type: ObjectType, id: &ObjectId) -> Result<String> {
        let state = self.state();
        if object_type == ObjectType::System {
            return Ok(state
                .acls
                .get(&(object_type, id.clone()))
                .cloned()
                .unwrap_or_default());
        }
        state
            .acls
            .get(&(object_type, id.clone()))
            .cloned()
            .ok_or_else(|| CatalogError::not_found(object_type.as_str(), id.as_str()))
    }

    async fn scan_default_privileges(
        &self,
        filter: &DefaultPrivilegeFilter,
    ) -> Result<Vec<DefaultPrivilege>> {
        Ok(self
            .state()
            .defaults
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    async fn apply_grant(&self, action: Action, grant: &ObjectGrant) -> Result<()> {
        let mut state = self.state();
        let role = Self::lookup_role(&state, &grant.role_name)?;
        let object_type = grant.object.object_type;
        let id = Self::lookup_object(&state, &grant.object)?;
        let key = (object_type, id);

        let raw = state.acls.get(&key).cloned().unwrap_or_default();
        let mut items = parse_acl_items(&raw)?;
        match action {
            Action::Grant => {
                match items
                    .iter_mut()
                    .find(|item| item.grantee == role && item.grantor == self.grantor)
                {
                    Some(item) => {
                        item.privileges.insert(grant.privilege);
                    }
                    None => items.push(AclItem::new(role, [grant.privilege], self.grantor.clone())),
                }
            }
            Action::Revoke => {
                for item in items.iter_mut().filter(|item| item.grantee == role) {
                    item.privileges.remove(&grant.privilege);
                }
                items.retain(|item| !item.privileges.is_empty());
            }
        }

        state.acls.insert(key, encode_acl(&items));
        Ok(())
    }

    async fn apply_default_grant(
        &self,
        action: Action,
        grant: &DefaultPrivilegeGrant,
    ) -> Result<()> {
        let mut state = self.state();
        let filter = DefaultPrivilegeFilter {
            object_type: grant.object_type,
            grantee_id: Self::lookup_role(&state, &grant.grantee_name)?,
            target_id: Self::lookup_role(&state, &grant.target_role_name)?,
            database_id: None,
            schema_id: None,
        };
        let (database_id, schema_id) = Self::lookup_scope(&state, grant)?;
        let filter = DefaultPrivilegeFilter {
            database_id,
            schema_id,
            ..filter
        };

        let existing = state.defaults.iter_mut().find(|row| filter.matches(row));
        match (action, existing) {
            (Action::Grant, Some(row)) => {
                row.privileges.insert(grant.privilege);
            }
            (Action::Grant, None) => state.defaults.push(DefaultPrivilege {
                object_type: filter.object_type,
                grantee_id: filter.grantee_id,
                target_id: filter.target_id,
                database_id: filter.database_id,
                schema_id: filter.schema_id,
                privileges: BTreeSet::from([grant.privilege]),
            }),
            (Action::Revoke, Some(row)) => {
                row.privileges.remove(&grant.privilege);
            }
            (Action::Revoke, None) => {}
        }
        state.defaults.retain(|row| !row.privileges.is_empty());
        Ok(())
    }
}
