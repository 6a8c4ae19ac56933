//! Error types for object identities and ids.

use thiserror::Error;

use crate::object::ObjectType;

/// Errors raised while building object identities or parsing ids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The object type keyword is not one mzgrant knows about.
    #[error("unknown object type '{0}'")]
    UnknownObjectType(String),

    /// A schema-scoped object was given without its schema or database.
    #[error("{object_type} '{name}' requires a {missing} name")]
    MissingQualifier {
        object_type: ObjectType,
        name: String,
        missing: &'static str,
    },

    /// A qualifier (or, for SYSTEM, a name) was given where the scope has none.
    #[error("{object_type} '{name}' does not take a {unexpected} qualifier")]
    UnexpectedQualifier {
        object_type: ObjectType,
        name: String,
        unexpected: &'static str,
    },

    /// Names and ids must not be empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
