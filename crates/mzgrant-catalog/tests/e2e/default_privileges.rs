//! Default privilege tests against live Materialize.

use super::common::*;
use mzgrant_catalog::GrantStatus;
use mzgrant_core::ObjectType;
use mzgrant_privilege::DefaultPrivilegeGrant;

pub async fn test_public_and_role_defaults_are_distinct(ctx: &TestContext) {
    println!("  🧪 test_public_and_role_defaults_are_distinct");

    let role = random_name("role");
    ctx.side_channel(&format!("CREATE ROLE {role};")).await;

    let public =
        DefaultPrivilegeGrant::new(ObjectType::Table, "PUBLIC", "PUBLIC", "SELECT").unwrap();
    let specific =
        DefaultPrivilegeGrant::new(ObjectType::Table, &role, "PUBLIC", "SELECT").unwrap();

    let public_was_present = ctx
        .inspector
        .check_default(&public)
        .await
        .unwrap()
        .status
        .is_present();

    let public_id = ctx.inspector.apply_default(&public).await.unwrap();
    let specific_id = ctx.inspector.apply_default(&specific).await.unwrap();
    assert_ne!(public_id, specific_id);

    let public_check = ctx.inspector.check_default(&public).await.unwrap();
    let specific_check = ctx.inspector.check_default(&specific).await.unwrap();
    assert!(public_check.status.is_present());
    assert!(specific_check.status.is_present());
    assert_eq!(public_check.rows.len(), 1);
    assert_eq!(specific_check.rows.len(), 1);
    assert!(public_check.rows[0].grantee_id.is_public());
    assert_eq!(specific_check.rows[0].grantee_id, specific_id.grantee_id);
    assert_ne!(public_check.rows[0], specific_check.rows[0]);

    assert!(ctx.inspector.revoke_default(&specific).await.unwrap());
    assert!(ctx.inspector.check_default(&public).await.unwrap().status.is_present());
    if !public_was_present {
        assert!(ctx.inspector.revoke_default(&public).await.unwrap());
    }
    ctx.side_channel(&format!("DROP ROLE {role};")).await;
    println!("    ✅ passed");
}

pub async fn test_default_privilege_drift(ctx: &TestContext) {
    println!("  🧪 test_default_privilege_drift");

    let grantee = random_name("grantee");
    let target = random_name("target");
    ctx.side_channel(&format!("CREATE ROLE {grantee};")).await;
    ctx.side_channel(&format!("CREATE ROLE {target};")).await;

    let grant = DefaultPrivilegeGrant::new(ObjectType::Type, &grantee, &target, "USAGE")
        .unwrap()
        .in_schema("materialize", "public");
    let id = ctx.inspector.apply_default(&grant).await.unwrap();
    assert!(ctx.inspector.read_default(id.clone()).await.unwrap().status.is_present());

    ctx.side_channel(&format!(
        "ALTER DEFAULT PRIVILEGES FOR ROLE {target} IN SCHEMA materialize.public \
         REVOKE USAGE ON TYPES FROM {grantee};"
    ))
    .await;

    let after = ctx.inspector.read_default(id).await.unwrap();
    assert_eq!(after.status, GrantStatus::Absent, "drift should be detected");
    assert!(after.rows.is_empty());

    ctx.side_channel(&format!("DROP ROLE {grantee};")).await;
    ctx.side_channel(&format!("DROP ROLE {target};")).await;
    println!("    ✅ passed");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📦 Default privilege tests");
    test_public_and_role_defaults_are_distinct(ctx).await;
    test_default_privilege_drift(ctx).await;
}
