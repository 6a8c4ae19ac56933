//! Diffing observed privilege state against what is wanted.
//!
//! A plan is empty when the observed state already matches. Drift introduced
//! behind mzgrant's back (a privilege revoked directly in SQL, say) shows up
//! as a non-empty plan on the next check.

use mzgrant_core::RoleId;
use serde::{Deserialize, Serialize};

use crate::acl::PrivilegeMap;
use crate::default_privilege::DefaultPrivilege;
use crate::privilege::Privilege;

/// One `(role, privilege)` pair that changed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrivilegeChange {
    pub role: RoleId,
    pub privilege: Privilege,
}

/// Changes between two privilege maps of the same object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeDiff {
    pub granted: Vec<PrivilegeChange>,
    pub revoked: Vec<PrivilegeChange>,
}

impl PrivilegeDiff {
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty()
    }
}

/// Pairs present in `after` but not `before` are granted; the reverse are revoked.
pub fn diff_maps(before: &PrivilegeMap, after: &PrivilegeMap) -> PrivilegeDiff {
    PrivilegeDiff {
        granted: missing_from(after, before),
        revoked: missing_from(before, after),
    }
}

fn missing_from(source: &PrivilegeMap, other: &PrivilegeMap) -> Vec<PrivilegeChange> {
    let mut changes = Vec::new();
    for (role, privileges) in source.iter() {
        let held = other.get(role);
        for privilege in privileges {
            if !held.is_some_and(|set| set.contains(privilege)) {
                changes.push(PrivilegeChange {
                    role: role.clone(),
                    privilege: *privilege,
                });
            }
        }
    }
    changes
}

/// What must happen to reach the wanted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantPlan {
    NoOp,
    Grant,
    Revoke,
}

impl GrantPlan {
    pub fn is_empty(&self) -> bool {
        matches!(self, GrantPlan::NoOp)
    }
}

/// Plan for "`role` should hold `privilege`" given the observed map.
pub fn plan_grant(role: &RoleId, privilege: Privilege, observed: &PrivilegeMap) -> GrantPlan {
    if observed.has_privilege(role, privilege.keyword()) {
        GrantPlan::NoOp
    } else {
        GrantPlan::Grant
    }
}

/// Plan for "`role` should not hold `privilege`" given the observed map.
pub fn plan_revoke(role: &RoleId, privilege: Privilege, observed: &PrivilegeMap) -> GrantPlan {
    if observed.has_privilege(role, privilege.keyword()) {
        GrantPlan::Revoke
    } else {
        GrantPlan::NoOp
    }
}

/// Plan for a default privilege given the rows matching its key (zero or one).
pub fn plan_default_grant(privilege: Privilege, observed: &[DefaultPrivilege]) -> GrantPlan {
    if observed
        .iter()
        .any(|row| row.has_privilege(privilege.keyword()))
    {
        GrantPlan::NoOp
    } else {
        GrantPlan::Grant
    }
}
