//! Grant lifecycle tests against the in-memory catalog.
//!
//! These follow the same shape as the live end-to-end tests: create objects,
//! grant, read back, change state behind the inspector's back, and check the
//! next plan notices.

use mzgrant_catalog::{AclStore, GrantInspector, GrantStatus, IdResolver, MemoryCatalog};
use mzgrant_core::{ObjectIdentity, ObjectType, RoleId};
use mzgrant_privilege::{DefaultPrivilegeGrant, ObjectGrant, Privilege};
use pretty_assertions::assert_eq;

fn orders_table() -> ObjectIdentity {
    ObjectIdentity::qualified(ObjectType::Table, "materialize", "public", "orders").unwrap()
}

fn setup() -> GrantInspector<MemoryCatalog> {
    let catalog = MemoryCatalog::new();
    catalog.create_role("analyst");
    catalog.create_role("loader");
    catalog.create_object(&ObjectIdentity::database("materialize").unwrap());
    catalog.create_object(&ObjectIdentity::schema("materialize", "public").unwrap());
    catalog.create_object(&orders_table());
    catalog.create_object(&ObjectIdentity::cluster("quickstart").unwrap());
    GrantInspector::new(catalog)
}

#[tokio::test]
async fn grant_then_out_of_band_revoke_is_detected() -> anyhow::Result<()> {
    let inspector = setup();
    let grant = ObjectGrant::new(orders_table(), "analyst", "SELECT")?;

    let before = inspector.check(&grant).await?;
    assert_eq!(before.status, GrantStatus::Absent);

    let id = inspector.apply(&grant).await?;
    assert_eq!(id.privilege, Privilege::Select);

    let analyst = inspector.catalog().role_id("analyst").await?;
    let privileges = inspector.object_privileges(&orders_table()).await?;
    assert!(privileges.has_privilege(&analyst, "SELECT"));
    assert!(!privileges.has_privilege(&analyst, "DELETE"));

    // Rewrite the stored ACL text directly, leaving only another role's grant.
    let loader = inspector.catalog().role_id("loader").await?;
    let table_id = inspector.catalog().object_id(&orders_table()).await?;
    inspector
        .catalog()
        .set_raw_acl(ObjectType::Table, &table_id, format!("{{{loader}=a/s1}}"));

    let after = inspector.read(id).await?;
    assert_eq!(after.status, GrantStatus::Absent);
    assert!(!after.privileges.has_privilege(&analyst, "SELECT"));
    assert!(after.privileges.has_privilege(&loader, "INSERT"));
    Ok(())
}

#[tokio::test]
async fn apply_and_revoke_are_idempotent() -> anyhow::Result<()> {
    let inspector = setup();
    let grant = ObjectGrant::new(ObjectIdentity::cluster("quickstart")?, "analyst", "USAGE")?;

    let first = inspector.apply(&grant).await?;
    let second = inspector.apply(&grant).await?;
    assert_eq!(first, second);

    assert!(inspector.revoke(&grant).await?);
    assert!(!inspector.revoke(&grant).await?);
    assert_eq!(inspector.check(&grant).await?.status, GrantStatus::Absent);
    Ok(())
}

#[tokio::test]
async fn revoking_one_privilege_keeps_the_others() -> anyhow::Result<()> {
    let inspector = setup();
    let select = ObjectGrant::new(orders_table(), "analyst", "SELECT")?;
    let insert = ObjectGrant::new(orders_table(), "analyst", "INSERT")?;
    inspector.apply(&select).await?;
    inspector.apply(&insert).await?;
    inspector.revoke(&insert).await?;

    let table_id = inspector.catalog().object_id(&orders_table()).await?;
    let raw = inspector
        .catalog()
        .scan_privileges(ObjectType::Table, &table_id)
        .await?;
    let analyst = inspector.catalog().role_id("analyst").await?;
    assert_eq!(raw, format!("{analyst}=r/s1"));
    Ok(())
}

#[tokio::test]
async fn grant_id_reads_back_after_round_trip_through_text() -> anyhow::Result<()> {
    let inspector = setup();
    let grant = ObjectGrant::new(orders_table(), "analyst", "UPDATE")?;
    let id = inspector.apply(&grant).await?;

    let reparsed = id.to_string().parse()?;
    let check = inspector.read(reparsed).await?;
    assert!(check.status.is_present());
    Ok(())
}

#[tokio::test]
async fn system_privileges() -> anyhow::Result<()> {
    let inspector = setup();
    let grant = ObjectGrant::new(ObjectIdentity::system(), "loader", "CREATECLUSTER")?;
    let id = inspector.apply(&grant).await?;
    assert_eq!(id.to_string(), format!("GRANT|SYSTEM||{}|CREATECLUSTER", id.role_id));
    assert!(inspector.check(&grant).await?.status.is_present());
    Ok(())
}

#[tokio::test]
async fn missing_objects_fail_with_not_found() {
    let inspector = setup();
    let ghost =
        ObjectIdentity::qualified(ObjectType::View, "materialize", "public", "ghost").unwrap();
    let grant = ObjectGrant::new(ghost, "analyst", "SELECT").unwrap();
    let err = inspector.check(&grant).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn public_default_privilege_is_distinct_from_role_default() -> anyhow::Result<()> {
    let inspector = setup();
    let public = DefaultPrivilegeGrant::new(ObjectType::Table, "PUBLIC", "PUBLIC", "SELECT")?;
    let specific = DefaultPrivilegeGrant::new(ObjectType::Table, "analyst", "PUBLIC", "SELECT")?;

    let public_id = inspector.apply_default(&public).await?;
    assert_eq!(public_id.to_string(), "GRANT DEFAULT|TABLE|p|p|||SELECT");
    assert_eq!(
        inspector.check_default(&specific).await?.status,
        GrantStatus::Absent
    );

    let specific_id = inspector.apply_default(&specific).await?;
    assert_ne!(public_id, specific_id);

    let check = inspector.check_default(&public).await?;
    assert_eq!(check.rows.len(), 1);
    assert_eq!(check.rows[0].grantee_id, RoleId::public());
    Ok(())
}

#[tokio::test]
async fn scoped_default_privilege_lifecycle() -> anyhow::Result<()> {
    let inspector = setup();
    let grant = DefaultPrivilegeGrant::new(ObjectType::Type, "analyst", "loader", "USAGE")?
        .in_schema("materialize", "public");

    let id = inspector.apply_default(&grant).await?;
    assert!(id.database_id.is_some());
    assert!(id.schema_id.is_some());
    assert!(inspector.read_default(id.clone()).await?.status.is_present());

    // The same grant without the schema scope is a different entry.
    let unscoped = DefaultPrivilegeGrant::new(ObjectType::Type, "analyst", "loader", "USAGE")?;
    assert_eq!(
        inspector.check_default(&unscoped).await?.status,
        GrantStatus::Absent
    );

    // Drop the stored row directly, then the next check reports drift.
    inspector.catalog().set_default_privileges(Vec::new());
    let after = inspector.read_default(id).await?;
    assert_eq!(after.status, GrantStatus::Absent);
    assert!(after.rows.is_empty());
    Ok(())
}
