//! Core types shared across mzgrant crates.
//!
//! - [`object`]: the kinds of database objects privileges apply to, and the
//!   identity tuple used to resolve an object to its catalog id.
//! - [`role`]: opaque role and object ids as the catalog reports them.
//! - [`config`]: connection and logging configuration loaded from YAML.

pub mod config;
pub mod error;
pub mod object;
pub mod role;

pub use config::{ConfigError, ConnectionConfig, LoggingConfig, MzgrantConfig, SslMode};
pub use error::ObjectError;
pub use object::{ObjectIdentity, ObjectScope, ObjectType};
pub use role::{ObjectId, RoleId};
