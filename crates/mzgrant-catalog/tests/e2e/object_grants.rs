//! Object privilege tests against live Materialize.

use super::common::*;
use mzgrant_catalog::{GrantStatus, IdResolver};
use mzgrant_core::{ObjectIdentity, ObjectType};
use mzgrant_privilege::ObjectGrant;

pub async fn test_table_select_grant_and_drift(ctx: &TestContext) {
    println!("  🧪 test_table_select_grant_and_drift");

    let role = random_name("role");
    let table = random_name("tbl");
    ctx.side_channel(&format!("CREATE ROLE {role};")).await;
    ctx.side_channel(&format!("CREATE TABLE materialize.public.{table} (id int);"))
        .await;

    let object =
        ObjectIdentity::qualified(ObjectType::Table, "materialize", "public", &table).unwrap();
    let grant = ObjectGrant::new(object.clone(), &role, "SELECT").unwrap();

    let id = ctx.inspector.apply(&grant).await.expect("grant should apply");
    let check = ctx.inspector.read(id.clone()).await.unwrap();
    assert_eq!(check.status, GrantStatus::Present);

    let role_id = ctx.catalog().role_id(&role).await.unwrap();
    let privileges = ctx.inspector.object_privileges(&object).await.unwrap();
    assert!(privileges.has_privilege(&role_id, "SELECT"));
    assert!(!privileges.has_privilege(&role_id, "DELETE"));

    ctx.side_channel(&format!(
        "REVOKE SELECT ON TABLE materialize.public.{table} FROM {role};"
    ))
    .await;

    let drifted = ctx.inspector.read(id).await.unwrap();
    assert_eq!(drifted.status, GrantStatus::Absent, "drift should be detected");

    ctx.side_channel(&format!("DROP TABLE materialize.public.{table};"))
        .await;
    ctx.side_channel(&format!("DROP ROLE {role};")).await;
    println!("    ✅ passed");
}

pub async fn test_cluster_usage_grant_and_revoke(ctx: &TestContext) {
    println!("  🧪 test_cluster_usage_grant_and_revoke");

    let role = random_name("role");
    let cluster = random_name("cl");
    ctx.side_channel(&format!("CREATE ROLE {role};")).await;
    ctx.side_channel(&format!("CREATE CLUSTER {cluster} SIZE = '1';"))
        .await;

    let grant =
        ObjectGrant::new(ObjectIdentity::cluster(&cluster).unwrap(), &role, "USAGE").unwrap();
    ctx.inspector.apply(&grant).await.unwrap();
    assert!(ctx.inspector.check(&grant).await.unwrap().status.is_present());

    assert!(ctx.inspector.revoke(&grant).await.unwrap());
    assert_eq!(
        ctx.inspector.check(&grant).await.unwrap().status,
        GrantStatus::Absent
    );

    ctx.side_channel(&format!("DROP CLUSTER {cluster};")).await;
    ctx.side_channel(&format!("DROP ROLE {role};")).await;
    println!("    ✅ passed");
}

pub async fn test_unknown_names_are_not_found(ctx: &TestContext) {
    println!("  🧪 test_unknown_names_are_not_found");

    let err = ctx
        .catalog()
        .role_id(&random_name("ghost"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let view = ObjectIdentity::qualified(
        ObjectType::View,
        "materialize",
        "public",
        random_name("ghost"),
    )
    .unwrap();
    assert!(ctx.catalog().object_id(&view).await.unwrap_err().is_not_found());
    println!("    ✅ passed");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📦 Object grant tests");
    test_table_select_grant_and_drift(ctx).await;
    test_cluster_usage_grant_and_revoke(ctx).await;
    test_unknown_names_are_not_found(ctx).await;
}
