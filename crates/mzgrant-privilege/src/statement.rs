//! SQL rendering for GRANT / REVOKE and ALTER DEFAULT PRIVILEGES.

use mzgrant_core::role::is_public_role_name;
use mzgrant_core::{ObjectIdentity, ObjectType};

use crate::grant::{DefaultPrivilegeGrant, ObjectGrant};

/// Whether a statement adds or removes a privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Grant,
    Revoke,
}

impl Action {
    fn keyword(&self) -> &'static str {
        match self {
            Action::Grant => "GRANT",
            Action::Revoke => "REVOKE",
        }
    }

    fn preposition(&self) -> &'static str {
        match self {
            Action::Grant => "TO",
            Action::Revoke => "FROM",
        }
    }
}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Role reference; PUBLIC stays an unquoted keyword.
pub fn role_ident(name: &str) -> String {
    if is_public_role_name(name) {
        "PUBLIC".to_string()
    } else {
        quote_ident(name)
    }
}

/// Fully qualified, quoted object name (`"db"."schema"."name"`).
pub fn qualified_name(object: &ObjectIdentity) -> String {
    object
        .name_parts()
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// `GRANT <priv> ON <type> <name> TO <role>;` or its REVOKE counterpart.
pub fn render_grant(action: Action, grant: &ObjectGrant) -> String {
    let target = match grant.object.object_type {
        ObjectType::System => "SYSTEM".to_string(),
        // Views, materialized views and sources are granted on as tables.
        ObjectType::View | ObjectType::MaterializedView | ObjectType::Source => {
            format!("TABLE {}", qualified_name(&grant.object))
        }
        object_type => format!("{} {}", object_type, qualified_name(&grant.object)),
    };
    format!(
        "{} {} ON {} {} {};",
        action.keyword(),
        grant.privilege,
        target,
        action.preposition(),
        role_ident(&grant.role_name)
    )
}

/// `ALTER DEFAULT PRIVILEGES FOR ROLE <target> [IN ...] GRANT <priv> ON <TYPES> TO <grantee>;`
///
/// A PUBLIC target renders as `FOR ALL ROLES`.
pub fn render_default_grant(action: Action, grant: &DefaultPrivilegeGrant) -> String {
    let mut sql = String::from("ALTER DEFAULT PRIVILEGES FOR ");
    if is_public_role_name(&grant.target_role_name) {
        sql.push_str("ALL ROLES");
    } else {
        sql.push_str("ROLE ");
        sql.push_str(&quote_ident(&grant.target_role_name));
    }

    match (&grant.database_name, &grant.schema_name) {
        (Some(database), Some(schema)) => {
            sql.push_str(&format!(
                " IN SCHEMA {}.{}",
                quote_ident(database),
                quote_ident(schema)
            ));
        }
        (None, Some(schema)) => {
            sql.push_str(&format!(" IN SCHEMA {}", quote_ident(schema)));
        }
        (Some(database), None) => {
            sql.push_str(&format!(" IN DATABASE {}", quote_ident(database)));
        }
        (None, None) => {}
    }

    sql.push_str(&format!(
        " {} {} ON {} {} {};",
        action.keyword(),
        grant.privilege,
        grant.object_type.plural(),
        action.preposition(),
        role_ident(&grant.grantee_name)
    ));
    sql
}
