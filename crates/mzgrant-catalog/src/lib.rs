//! # mzgrant-catalog
//!
//! Everything in mzgrant that touches the database.
//!
//! - [`IdResolver`]: role and object names to catalog ids
//! - [`AclStore`]: read ACLs and default privileges, apply grant statements
//! - [`MaterializeCatalog`]: both traits against a live instance (sqlx)
//! - [`MemoryCatalog`]: both traits in memory, for tests
//! - [`GrantInspector`]: the grant lifecycle (resolve, check, apply, revoke)
//!   built on the two traits and the privilege codec

pub mod error;
pub mod inspector;
pub mod materialize;
pub mod memory;
pub mod traits;

pub use error::{CatalogError, Result};
pub use inspector::{DefaultGrantCheck, DefaultKey, GrantCheck, GrantInspector, GrantStatus};
pub use materialize::MaterializeCatalog;
pub use memory::MemoryCatalog;
pub use traits::{AclStore, IdResolver};
