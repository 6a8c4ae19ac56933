//! `mzgrant id parse` - decode a grant identifier without touching the database.

use anyhow::{Result, bail};
use mzgrant_privilege::{DefaultGrantId, GrantId, IdKind, id_kind};
use serde::Serialize;

/// A decoded identifier of either format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedId {
    Grant(GrantId),
    DefaultGrant(DefaultGrantId),
}

pub fn decode(id: &str) -> Result<ParsedId> {
    Ok(match id_kind(id) {
        Some(IdKind::Grant) => ParsedId::Grant(id.parse()?),
        Some(IdKind::DefaultGrant) => ParsedId::DefaultGrant(id.parse()?),
        None => bail!("'{}' is neither a grant nor a default-privilege identifier", id),
    })
}

pub fn parse(id: &str, json: bool) -> Result<()> {
    let parsed = decode(id)?;
    if json {
        return super::print_json(&parsed);
    }

    match &parsed {
        ParsedId::Grant(grant) => {
            println!("Grant");
            println!("   object type: {}", grant.object_type);
            if !grant.object_id.as_str().is_empty() {
                println!("   object id:   {}", grant.object_id);
            }
            println!("   role id:     {}", grant.role_id);
            println!("   privilege:   {}", grant.privilege);
        }
        ParsedId::DefaultGrant(grant) => {
            println!("Default privilege");
            println!("   object type: {}", grant.object_type);
            println!("   grantee id:  {}", grant.grantee_id);
            println!("   target id:   {}", grant.target_id);
            if let Some(database) = &grant.database_id {
                println!("   database id: {}", database);
            }
            if let Some(schema) = &grant.schema_id {
                println!("   schema id:   {}", schema);
            }
            println!("   privilege:   {}", grant.privilege);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mzgrant_core::ObjectType;
    use mzgrant_privilege::Privilege;

    #[test]
    fn decodes_both_formats() {
        let ParsedId::Grant(grant) = decode("GRANT|TABLE|u7|u2|SELECT").unwrap() else {
            panic!("expected grant id");
        };
        assert_eq!(grant.object_type, ObjectType::Table);
        assert_eq!(grant.object_id.as_str(), "u7");

        let ParsedId::DefaultGrant(default) =
            decode("GRANT DEFAULT|SECRET|u2|p|u1||USAGE").unwrap()
        else {
            panic!("expected default grant id");
        };
        assert_eq!(default.privilege, Privilege::Usage);
        assert!(default.target_id.is_public());
        assert!(default.schema_id.is_none());
    }

    #[test]
    fn rejects_unrecognised_and_invalid_ids() {
        assert!(decode("REVOKE|TABLE|u7|u2|SELECT").is_err());
        assert!(decode("GRANT|CLUSTER|u1|u2|SELECT").is_err());
    }

    #[test]
    fn json_output_is_tagged() {
        let parsed = decode("GRANT|SYSTEM||u3|CREATEROLE").unwrap();
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["kind"], "grant");
        assert_eq!(value["privilege"], "CREATEROLE");
        assert_eq!(value["object_id"], "");
    }
}
