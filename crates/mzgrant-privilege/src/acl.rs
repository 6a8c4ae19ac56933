//! Access-control list codec.
//!
//! The catalog reports an object's ACL as a list of items of the form
//! `grantee=flags/grantor`, e.g. `u1=arwd/u0,p=r/u0`. When read as text the
//! list may be wrapped in `{...}` the way Postgres prints arrays. Each flag is
//! the single-character code of a [`Privilege`].
//!
//! Parsing is pure and total over well-formed input. Malformed input is
//! reported as a [`ParseError`] naming the offending item.

use mzgrant_core::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ParseErrorReason};
use crate::privilege::Privilege;

/// One entry of an object's access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclItem {
    pub grantee: RoleId,
    pub privileges: BTreeSet<Privilege>,
    pub grantor: RoleId,
}

impl AclItem {
    pub fn new(
        grantee: RoleId,
        privileges: impl IntoIterator<Item = Privilege>,
        grantor: RoleId,
    ) -> Self {
        Self {
            grantee,
            privileges: privileges.into_iter().collect(),
            grantor,
        }
    }

    /// Parse a single `grantee=flags/grantor` item.
    ///
    /// An empty grantee denotes PUBLIC.
    pub fn parse(item: &str) -> Result<Self, ParseError> {
        let trimmed = unquote(item.trim());
        if trimmed.is_empty() {
            return Err(ParseError::new(item, ParseErrorReason::EmptyItem));
        }

        let (grantee, rest) = trimmed
            .split_once('=')
            .ok_or_else(|| ParseError::new(item, ParseErrorReason::MissingEquals))?;
        let (flags, grantor) = rest
            .split_once('/')
            .ok_or_else(|| ParseError::new(item, ParseErrorReason::MissingSlash))?;
        if grantor.is_empty() {
            return Err(ParseError::new(item, ParseErrorReason::EmptyGrantor));
        }

        let grantee = if grantee.is_empty() {
            RoleId::public()
        } else {
            RoleId::new(grantee)
        };

        Ok(Self {
            grantee,
            privileges: parse_flags(flags).map_err(|reason| ParseError::new(item, reason))?,
            grantor: RoleId::new(grantor),
        })
    }
}

impl FromStr for AclItem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AclItem::parse(s)
    }
}

impl fmt::Display for AclItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}/{}",
            self.grantee,
            encode_flags(&self.privileges),
            self.grantor
        )
    }
}

/// Parse a run of privilege codes such as `arwd`.
pub fn parse_flags(flags: &str) -> Result<BTreeSet<Privilege>, ParseErrorReason> {
    flags
        .chars()
        .map(|c| Privilege::from_code(c).ok_or(ParseErrorReason::UnknownCode(c)))
        .collect()
}

/// Encode privileges as codes in canonical order.
pub fn encode_flags(privileges: &BTreeSet<Privilege>) -> String {
    privileges.iter().map(Privilege::code).collect()
}

/// Parse a raw ACL string into its items, preserving grantors and order.
pub fn parse_acl_items(raw: &str) -> Result<Vec<AclItem>, ParseError> {
    let body = strip_braces(raw)?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',').map(AclItem::parse).collect()
}

/// Encode items as the comma-separated ACL grammar (without braces).
pub fn encode_acl(items: &[AclItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a raw ACL string and fold its items by grantee.
pub fn parse_privileges(raw: &str) -> Result<PrivilegeMap, ParseError> {
    let items = parse_acl_items(raw)?;
    tracing::trace!(items = items.len(), "parsed ACL");
    Ok(PrivilegeMap::from_items(&items))
}

/// Whether `privileges` contains the privilege named by `keyword`.
///
/// The keyword match is exact and case-sensitive (`"SELECT"`, not
/// `"select"`). A role with no entry (`None`) holds nothing.
pub fn has_privilege(privileges: Option<&BTreeSet<Privilege>>, keyword: &str) -> bool {
    match (privileges, Privilege::from_keyword(keyword)) {
        (Some(set), Some(privilege)) => set.contains(&privilege),
        _ => false,
    }
}

/// Privileges held on one object, per grantee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegeMap(BTreeMap<RoleId, BTreeSet<Privilege>>);

impl PrivilegeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold items by grantee, unioning privileges granted by different grantors.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a AclItem>) -> Self {
        let mut map = Self::new();
        for item in items {
            map.extend_role(&item.grantee, item.privileges.iter().copied());
        }
        map
    }

    pub fn extend_role(&mut self, role: &RoleId, privileges: impl IntoIterator<Item = Privilege>) {
        self.0.entry(role.clone()).or_default().extend(privileges);
    }

    pub fn get(&self, role: &RoleId) -> Option<&BTreeSet<Privilege>> {
        self.0.get(role)
    }

    pub fn has_privilege(&self, role: &RoleId, keyword: &str) -> bool {
        has_privilege(self.get(role), keyword)
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleId, &BTreeSet<Privilege>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Re-encode as ACL items attributed to a single grantor.
    pub fn to_items(&self, grantor: &RoleId) -> Vec<AclItem> {
        self.0
            .iter()
            .map(|(grantee, privileges)| AclItem {
                grantee: grantee.clone(),
                privileges: privileges.clone(),
                grantor: grantor.clone(),
            })
            .collect()
    }

    pub fn encode(&self, grantor: &RoleId) -> String {
        encode_acl(&self.to_items(grantor))
    }
}

impl FromIterator<(RoleId, BTreeSet<Privilege>)> for PrivilegeMap {
    fn from_iter<I: IntoIterator<Item = (RoleId, BTreeSet<Privilege>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (role, privileges) in iter {
            map.extend_role(&role, privileges);
        }
        map
    }
}

fn strip_braces(raw: &str) -> Result<&str, ParseError> {
    let trimmed = raw.trim();
    match (trimmed.strip_prefix('{'), trimmed.ends_with('}')) {
        (Some(inner), true) => Ok(&inner[..inner.len() - 1]),
        (None, false) => Ok(trimmed),
        _ => Err(ParseError::new(raw, ParseErrorReason::UnbalancedBraces)),
    }
}

fn unquote(item: &str) -> &str {
    item.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(item)
}
