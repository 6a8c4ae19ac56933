//! # mzgrant-privilege
//!
//! The privilege model: how Materialize encodes access-control lists and how
//! mzgrant reasons about them.
//!
//! - [`acl`]: parse `grantee=flags/grantor` ACL strings into a
//!   [`PrivilegeMap`] and answer "does role R hold privilege P?"
//! - [`privilege`]: the single-character privilege codes, their keywords and
//!   which object types accept which privileges
//! - [`id`]: the two stable grant identifier formats
//! - [`statement`]: SQL for GRANT, REVOKE and ALTER DEFAULT PRIVILEGES
//! - [`diff`]: compare observed state with wanted state
//!
//! Everything here is pure and synchronous; reading from or writing to the
//! database lives in `mzgrant-catalog`.
//!
//! ```
//! use mzgrant_core::RoleId;
//! use mzgrant_privilege::parse_privileges;
//!
//! let map = parse_privileges("u1=ar/u0").unwrap();
//! assert!(map.has_privilege(&RoleId::new("u1"), "SELECT"));
//! assert!(!map.has_privilege(&RoleId::new("u1"), "DELETE"));
//! ```

pub mod acl;
pub mod default_privilege;
pub mod diff;
pub mod error;
pub mod grant;
pub mod id;
pub mod privilege;
pub mod statement;

pub use acl::{AclItem, PrivilegeMap, encode_acl, has_privilege, parse_acl_items, parse_privileges};
pub use default_privilege::{DefaultPrivilege, DefaultPrivilegeFilter};
pub use diff::{GrantPlan, PrivilegeChange, PrivilegeDiff, diff_maps, plan_default_grant, plan_grant, plan_revoke};
pub use error::{IdError, ParseError, ParseErrorReason, PrivilegeError};
pub use grant::{DefaultPrivilegeGrant, ObjectGrant};
pub use id::{DefaultGrantId, GrantId, IdKind, id_kind};
pub use privilege::{Privilege, object_privileges, validate_default_privilege, validate_privilege};
pub use statement::Action;
