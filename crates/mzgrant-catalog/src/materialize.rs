//! Catalog access against a live Materialize instance.
//!
//! Materialize speaks the Postgres wire protocol, so this uses sqlx's
//! Postgres driver. Ids come from the `mz_catalog` relations; ACLs are read
//! as the text rendering of their `mz_aclitem[]` columns.

use async_trait::async_trait;
use mzgrant_core::role::is_public_role_name;
use mzgrant_core::{ConnectionConfig, ObjectId, ObjectIdentity, ObjectScope, ObjectType, RoleId};
use mzgrant_privilege::acl::parse_flags;
use mzgrant_privilege::statement::{render_default_grant, render_grant};
use mzgrant_privilege::{
    Action, DefaultPrivilege, DefaultPrivilegeFilter, DefaultPrivilegeGrant, ObjectGrant,
    ParseError,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;

use crate::error::{CatalogError, Result};
use crate::traits::{AclStore, IdResolver};

/// Catalog relation holding objects of `object_type`, or `None` for SYSTEM.
pub fn catalog_relation(object_type: ObjectType) -> Option<&'static str> {
    match object_type {
        ObjectType::Cluster => Some("mz_clusters"),
        ObjectType::Connection => Some("mz_connections"),
        ObjectType::Database => Some("mz_databases"),
        ObjectType::Schema => Some("mz_schemas"),
        ObjectType::Secret => Some("mz_secrets"),
        ObjectType::Source => Some("mz_sources"),
        ObjectType::Table => Some("mz_tables"),
        ObjectType::Type => Some("mz_types"),
        ObjectType::View => Some("mz_views"),
        ObjectType::MaterializedView => Some("mz_materialized_views"),
        ObjectType::System => None,
    }
}

pub struct MaterializeCatalog {
    pool: PgPool,
}

impl MaterializeCatalog {
    /// Connect using the configured URL and pool settings.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_seconds))
            .connect(&config.connection_string())
            .await?;
        tracing::debug!(
            host = %config.host,
            port = config.port,
            "connected to Materialize"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run arbitrary SQL using the simple query protocol.
    pub async fn execute(&self, sql: &str) -> Result<()> {
        tracing::debug!(statement = %sql, "executing");
        sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch_id(&self, sql: &str, binds: &[&str], kind: &str, name: &str) -> Result<String> {
        tracing::debug!(kind, name, "resolving id");
        let mut query = sqlx::query(sql);
        for bind in binds {
            query = query.bind(*bind);
        }
        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found(kind, name))?;
        Ok(row.try_get::<String, _>("id")?)
    }
}

#[async_trait]
impl IdResolver for MaterializeCatalog {
    async fn role_id(&self, name: &str) -> Result<RoleId> {
        if is_public_role_name(name) {
            return Ok(RoleId::public());
        }
        let id = self
            .fetch_id("SELECT id FROM mz_roles WHERE name = $1", &[name], "role", name)
            .await?;
        Ok(RoleId::new(id))
    }

    async fn object_id(&self, object: &ObjectIdentity) -> Result<ObjectId> {
        let object_type = object.object_type;
        let Some(relation) = catalog_relation(object_type) else {
            return Ok(ObjectId::new(""));
        };
        let kind = object_type.as_str();
        let display = object.name_parts().join(".");

        let id = match object_type.scope() {
            ObjectScope::System => return Ok(ObjectId::new("")),
            ObjectScope::Account => {
                let sql = format!("SELECT id FROM {relation} WHERE name = $1");
                self.fetch_id(&sql, &[object.name.as_str()], kind, &display).await?
            }
            ObjectScope::Database => {
                let database = qualifier(object, object.database_name.as_deref(), "database")?;
                self.fetch_id(
                    "SELECT s.id FROM mz_schemas s \
                     JOIN mz_databases d ON s.database_id = d.id \
                     WHERE s.name = $1 AND d.name = $2",
                    &[object.name.as_str(), database],
                    kind,
                    &display,
                )
                .await?
            }
            ObjectScope::Schema => {
                let schema = qualifier(object, object.schema_name.as_deref(), "schema")?;
                let database = qualifier(object, object.database_name.as_deref(), "database")?;
                let sql = format!(
                    "SELECT o.id FROM {relation} o \
                     JOIN mz_schemas s ON o.schema_id = s.id \
                     JOIN mz_databases d ON s.database_id = d.id \
                     WHERE o.name = $1 AND s.name = $2 AND d.name = $3"
                );
                self.fetch_id(&sql, &[object.name.as_str(), schema, database], kind, &display)
                    .await?
            }
        };
        Ok(ObjectId::new(id))
    }
}

fn qualifier<'a>(
    object: &ObjectIdentity,
    value: Option<&'a str>,
    missing: &'static str,
) -> Result<&'a str> {
    value.ok_or_else(|| {
        CatalogError::Object(mzgrant_core::ObjectError::MissingQualifier {
            object_type: object.object_type,
            name: object.name.clone(),
            missing,
        })
    })
}

#[async_trait]
impl AclStore for MaterializeCatalog {
    async fn scan_privileges(&self, object_type: ObjectType, id: &ObjectId) -> Result<String> {
        let Some(relation) = catalog_relation(object_type) else {
            let rows = sqlx::query("SELECT privileges::text AS privileges FROM mz_system_privileges")
                .fetch_all(&self.pool)
                .await?;
            let items = rows
                .iter()
                .map(|row| row.try_get::<String, _>("privileges"))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(items = items.len(), "scanned system privileges");
            return Ok(items.join(","));
        };

        let sql = format!("SELECT privileges::text AS privileges FROM {relation} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found(object_type.as_str(), id.as_str()))?;
        let raw: Option<String> = row.try_get("privileges")?;
        tracing::debug!(%object_type, %id, raw = raw.as_deref().unwrap_or(""), "scanned privileges");
        Ok(raw.unwrap_or_default())
    }

    async fn scan_default_privileges(
        &self,
        filter: &DefaultPrivilegeFilter,
    ) -> Result<Vec<DefaultPrivilege>> {
        let rows = sqlx::query(
            "SELECT object_type, grantee, role_id, database_id, schema_id, privileges \
             FROM mz_default_privileges \
             WHERE object_type = $1 AND grantee = $2 AND role_id = $3 \
               AND database_id IS NOT DISTINCT FROM $4 \
               AND schema_id IS NOT DISTINCT FROM $5",
        )
        .bind(filter.object_type.catalog_name())
        .bind(filter.grantee_id.as_str())
        .bind(filter.target_id.as_str())
        .bind(filter.database_id.as_ref().map(ObjectId::as_str))
        .bind(filter.schema_id.as_ref().map(ObjectId::as_str))
        .fetch_all(&self.pool)
        .await?;

        let mut privileges = Vec::with_capacity(rows.len());
        for row in rows {
            let object_type: String = row.try_get("object_type")?;
            let flags: String = row.try_get("privileges")?;
            privileges.push(DefaultPrivilege {
                object_type: object_type.parse()?,
                grantee_id: RoleId::new(row.try_get::<String, _>("grantee")?),
                target_id: RoleId::new(row.try_get::<String, _>("role_id")?),
                database_id: row
                    .try_get::<Option<String>, _>("database_id")?
                    .map(ObjectId::new),
                schema_id: row
                    .try_get::<Option<String>, _>("schema_id")?
                    .map(ObjectId::new),
                privileges: parse_flags(&flags).map_err(|reason| ParseError::new(&flags, reason))?,
            });
        }
        tracing::debug!(
            object_type = %filter.object_type,
            grantee = %filter.grantee_id,
            target = %filter.target_id,
            rows = privileges.len(),
            "scanned default privileges"
        );
        Ok(privileges)
    }

    async fn apply_grant(&self, action: Action, grant: &ObjectGrant) -> Result<()> {
        let sql = render_grant(action, grant);
        tracing::info!(statement = %sql, "applying grant");
        self.execute(&sql).await
    }

    async fn apply_default_grant(
        &self,
        action: Action,
        grant: &DefaultPrivilegeGrant,
    ) -> Result<()> {
        let sql = render_default_grant(action, grant);
        tracing::info!(statement = %sql, "applying default privilege");
        self.execute(&sql).await
    }
}
