//! Database object types and identities.
//!
//! Object types are the uppercase SQL keywords the database uses in `GRANT`
//! statements. An [`ObjectIdentity`] names one object precisely enough to
//! resolve it to a catalog id; which qualifiers it carries depends on the
//! type's [`ObjectScope`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ObjectError;

/// The kind of database object a privilege applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Cluster,
    Connection,
    Database,
    Schema,
    Secret,
    Source,
    Table,
    Type,
    View,
    #[serde(rename = "MATERIALIZED VIEW")]
    MaterializedView,
    /// Account-wide system privileges (CREATEROLE, CREATEDB, CREATECLUSTER).
    System,
}

/// Where an object type lives, which decides the qualifiers its identity needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectScope {
    /// The single account-wide system object.
    System,
    /// Named directly at account level (databases, clusters).
    Account,
    /// Named within a database (schemas).
    Database,
    /// Named within a schema (tables, views, secrets, ...).
    Schema,
}

impl ObjectType {
    /// All supported object types.
    pub const ALL: [ObjectType; 11] = [
        ObjectType::Cluster,
        ObjectType::Connection,
        ObjectType::Database,
        ObjectType::Schema,
        ObjectType::Secret,
        ObjectType::Source,
        ObjectType::Table,
        ObjectType::Type,
        ObjectType::View,
        ObjectType::MaterializedView,
        ObjectType::System,
    ];

    /// SQL keyword as used in `GRANT ... ON <keyword> ...`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Cluster => "CLUSTER",
            ObjectType::Connection => "CONNECTION",
            ObjectType::Database => "DATABASE",
            ObjectType::Schema => "SCHEMA",
            ObjectType::Secret => "SECRET",
            ObjectType::Source => "SOURCE",
            ObjectType::Table => "TABLE",
            ObjectType::Type => "TYPE",
            ObjectType::View => "VIEW",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::System => "SYSTEM",
        }
    }

    /// Plural keyword used by `ALTER DEFAULT PRIVILEGES ... ON <plural>`.
    pub fn plural(&self) -> &'static str {
        match self {
            ObjectType::Cluster => "CLUSTERS",
            ObjectType::Connection => "CONNECTIONS",
            ObjectType::Database => "DATABASES",
            ObjectType::Schema => "SCHEMAS",
            ObjectType::Secret => "SECRETS",
            ObjectType::Source => "SOURCES",
            ObjectType::Table => "TABLES",
            ObjectType::Type => "TYPES",
            ObjectType::View => "VIEWS",
            ObjectType::MaterializedView => "MATERIALIZED VIEWS",
            ObjectType::System => "SYSTEM",
        }
    }

    /// Lowercase name stored in the `object_type` column of `mz_default_privileges`.
    pub fn catalog_name(&self) -> &'static str {
        match self {
            ObjectType::Cluster => "cluster",
            ObjectType::Connection => "connection",
            ObjectType::Database => "database",
            ObjectType::Schema => "schema",
            ObjectType::Secret => "secret",
            ObjectType::Source => "source",
            ObjectType::Table => "table",
            ObjectType::Type => "type",
            ObjectType::View => "view",
            ObjectType::MaterializedView => "materialized view",
            ObjectType::System => "system",
        }
    }

    pub fn scope(&self) -> ObjectScope {
        match self {
            ObjectType::System => ObjectScope::System,
            ObjectType::Database | ObjectType::Cluster => ObjectScope::Account,
            ObjectType::Schema => ObjectScope::Database,
            ObjectType::Connection
            | ObjectType::Secret
            | ObjectType::Source
            | ObjectType::Table
            | ObjectType::Type
            | ObjectType::View
            | ObjectType::MaterializedView => ObjectScope::Schema,
        }
    }

    /// Whether `ALTER DEFAULT PRIVILEGES` accepts this type.
    ///
    /// Views, materialized views and sources are covered by `TABLES`.
    pub fn supports_default_privileges(&self) -> bool {
        matches!(
            self,
            ObjectType::Cluster
                | ObjectType::Connection
                | ObjectType::Database
                | ObjectType::Schema
                | ObjectType::Secret
                | ObjectType::Table
                | ObjectType::Type
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ObjectError;

    /// Parses an object type keyword, ignoring case, surrounding whitespace and
    /// `_`/`-` in place of the space in `MATERIALIZED VIEW`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ObjectError::UnknownObjectType(s.to_string()))
    }
}

/// Identity of one database object, enough to resolve it to a catalog id.
///
/// Deserialization goes through [`ObjectIdentity::new`], so identities read
/// from files obey the same scope rules as those built in code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawObjectIdentity")]
pub struct ObjectIdentity {
    pub object_type: ObjectType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
}

impl ObjectIdentity {
    /// Build an identity, checking that the qualifiers match the type's scope.
    pub fn new(
        object_type: ObjectType,
        name: impl Into<String>,
        schema_name: Option<String>,
        database_name: Option<String>,
    ) -> Result<Self, ObjectError> {
        let name = name.into();
        match (object_type, name.is_empty()) {
            (ObjectType::System, false) => {
                return Err(ObjectError::UnexpectedQualifier {
                    object_type,
                    name,
                    unexpected: "name",
                });
            }
            (ObjectType::System, true) | (_, false) => {}
            (_, true) => return Err(ObjectError::Empty("object name")),
        }

        let (needs_schema, needs_database) = match object_type.scope() {
            ObjectScope::System | ObjectScope::Account => (false, false),
            ObjectScope::Database => (false, true),
            ObjectScope::Schema => (true, true),
        };

        let check = |value: &Option<String>, needed: bool, what: &'static str| {
            match (value, needed) {
                (None, true) => Err(ObjectError::MissingQualifier {
                    object_type,
                    name: name.clone(),
                    missing: what,
                }),
                (Some(v), true) if v.is_empty() => Err(ObjectError::MissingQualifier {
                    object_type,
                    name: name.clone(),
                    missing: what,
                }),
                (Some(_), false) => Err(ObjectError::UnexpectedQualifier {
                    object_type,
                    name: name.clone(),
                    unexpected: what,
                }),
                _ => Ok(()),
            }
        };
        check(&schema_name, needs_schema, "schema")?;
        check(&database_name, needs_database, "database")?;

        Ok(Self {
            object_type,
            name,
            schema_name,
            database_name,
        })
    }

    pub fn database(name: impl Into<String>) -> Result<Self, ObjectError> {
        Self::new(ObjectType::Database, name, None, None)
    }

    pub fn cluster(name: impl Into<String>) -> Result<Self, ObjectError> {
        Self::new(ObjectType::Cluster, name, None, None)
    }

    pub fn schema(
        database: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ObjectError> {
        Self::new(ObjectType::Schema, name, None, Some(database.into()))
    }

    /// A schema-scoped object such as a table, view or secret.
    pub fn qualified(
        object_type: ObjectType,
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ObjectError> {
        Self::new(
            object_type,
            name,
            Some(schema.into()),
            Some(database.into()),
        )
    }

    /// The account-wide system object.
    pub fn system() -> Self {
        Self {
            object_type: ObjectType::System,
            name: String::new(),
            schema_name: None,
            database_name: None,
        }
    }

    /// Name parts from outermost to innermost: `[database, schema, name]`
    /// with absent qualifiers omitted.
    pub fn name_parts(&self) -> Vec<&str> {
        self.database_name
            .iter()
            .chain(self.schema_name.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}

/// Unchecked wire form of [`ObjectIdentity`].
#[derive(Deserialize)]
struct RawObjectIdentity {
    object_type: ObjectType,
    #[serde(default)]
    name: String,
    #[serde(default)]
    schema_name: Option<String>,
    #[serde(default)]
    database_name: Option<String>,
}

impl TryFrom<RawObjectIdentity> for ObjectIdentity {
    type Error = ObjectError;

    fn try_from(raw: RawObjectIdentity) -> Result<Self, Self::Error> {
        ObjectIdentity::new(
            raw.object_type,
            raw.name,
            raw.schema_name,
            raw.database_name,
        )
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.object_type == ObjectType::System {
            return f.write_str("SYSTEM");
        }
        write!(f, "{} {}", self.object_type, self.name_parts().join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_types_loosely() {
        assert_eq!("table".parse::<ObjectType>(), Ok(ObjectType::Table));
        assert_eq!(
            "materialized_view".parse::<ObjectType>(),
            Ok(ObjectType::MaterializedView)
        );
        assert_eq!(
            " MATERIALIZED VIEW ".parse::<ObjectType>(),
            Ok(ObjectType::MaterializedView)
        );
        assert!(matches!(
            "INDEX".parse::<ObjectType>(),
            Err(ObjectError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for t in ObjectType::ALL {
            assert_eq!(t.to_string().parse::<ObjectType>(), Ok(t));
        }
    }

    #[test]
    fn default_privilege_plurals_are_irregular_where_needed() {
        assert_eq!(ObjectType::Table.plural(), "TABLES");
        assert_eq!(ObjectType::Type.plural(), "TYPES");
        assert_eq!(ObjectType::MaterializedView.plural(), "MATERIALIZED VIEWS");
    }

    #[test]
    fn serde_uses_sql_keywords() {
        let yaml = serde_yaml::to_string(&ObjectType::MaterializedView).unwrap();
        assert_eq!(yaml.trim(), "MATERIALIZED VIEW");
        let parsed: ObjectType = serde_yaml::from_str("TABLE").unwrap();
        assert_eq!(parsed, ObjectType::Table);
    }

    #[test]
    fn schema_scoped_identity_requires_qualifiers() {
        let err = ObjectIdentity::new(ObjectType::Table, "t", None, Some("db".into()));
        assert!(matches!(
            err,
            Err(ObjectError::MissingQualifier {
                missing: "schema",
                ..
            })
        ));

        let ok = ObjectIdentity::qualified(ObjectType::Table, "db", "public", "t").unwrap();
        assert_eq!(ok.name_parts(), vec!["db", "public", "t"]);
        assert_eq!(ok.to_string(), "TABLE db.public.t");
    }

    #[test]
    fn account_scoped_identity_rejects_qualifiers() {
        let err = ObjectIdentity::new(
            ObjectType::Cluster,
            "quickstart",
            None,
            Some("materialize".into()),
        );
        assert!(matches!(
            err,
            Err(ObjectError::UnexpectedQualifier {
                unexpected: "database",
                ..
            })
        ));
        assert!(ObjectIdentity::database("materialize").is_ok());
    }

    #[test]
    fn schema_identity_needs_only_database() {
        let s = ObjectIdentity::schema("materialize", "public").unwrap();
        assert_eq!(s.name_parts(), vec!["materialize", "public"]);
        assert!(ObjectIdentity::new(
            ObjectType::Schema,
            "public",
            Some("x".into()),
            Some("materialize".into())
        )
        .is_err());
    }

    #[test]
    fn system_identity_takes_no_name() {
        assert_eq!(
            ObjectIdentity::new(ObjectType::System, "", None, None),
            Ok(ObjectIdentity::system())
        );
        assert!(matches!(
            ObjectIdentity::new(ObjectType::System, "x", None, None),
            Err(ObjectError::UnexpectedQualifier {
                unexpected: "name",
                ..
            })
        ));
    }

    #[test]
    fn deserializing_applies_scope_rules() {
        let table: ObjectIdentity = serde_yaml::from_str(
            "{ object_type: TABLE, database_name: materialize, schema_name: public, name: orders }",
        )
        .unwrap();
        assert_eq!(table.to_string(), "TABLE materialize.public.orders");

        let system: ObjectIdentity = serde_yaml::from_str("object_type: SYSTEM").unwrap();
        assert_eq!(system, ObjectIdentity::system());

        for yaml in [
            "{ object_type: CLUSTER, name: quickstart, database_name: bogus, schema_name: bogus }",
            "{ object_type: TABLE, name: orders }",
            "{ object_type: DATABASE, name: '' }",
        ] {
            let err = serde_yaml::from_str::<ObjectIdentity>(yaml).unwrap_err();
            assert!(
                err.to_string().contains("qualifier")
                    || err.to_string().contains("requires")
                    || err.to_string().contains("empty"),
                "{yaml}: {err}"
            );
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            ObjectIdentity::database(""),
            Err(ObjectError::Empty("object name"))
        );
    }
}
