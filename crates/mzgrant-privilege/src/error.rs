//! Error types for the privilege codec.

use mzgrant_core::{ObjectError, ObjectType};
use thiserror::Error;

/// A raw ACL string could not be parsed.
///
/// Carries the offending item so malformed catalog output is debuggable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed ACL item '{fragment}': {reason}")]
pub struct ParseError {
    /// The item (or whole input, for structural problems) that failed.
    pub fragment: String,
    pub reason: ParseErrorReason,
}

impl ParseError {
    pub fn new(fragment: impl Into<String>, reason: ParseErrorReason) -> Self {
        Self {
            fragment: fragment.into(),
            reason,
        }
    }
}

/// Why an ACL item failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorReason {
    #[error("missing '=' between grantee and privileges")]
    MissingEquals,

    #[error("missing '/' between privileges and grantor")]
    MissingSlash,

    #[error("empty grantor")]
    EmptyGrantor,

    #[error("empty item")]
    EmptyItem,

    #[error("unknown privilege code '{0}'")]
    UnknownCode(char),

    #[error("unbalanced braces")]
    UnbalancedBraces,
}

/// A privilege keyword was invalid for the requested use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrivilegeError {
    #[error("unknown privilege '{0}'")]
    UnknownPrivilege(String),

    #[error("{privilege} is not a valid privilege on {object_type}; expected one of: {allowed}")]
    NotApplicable {
        privilege: String,
        object_type: ObjectType,
        allowed: String,
    },

    #[error("default privileges cannot be set on {0}")]
    DefaultPrivilegesUnsupported(ObjectType),
}

/// A grant identifier could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("'{0}' is not a valid grant identifier")]
    Malformed(String),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Privilege(#[from] PrivilegeError),
}
