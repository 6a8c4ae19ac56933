//! Shared infrastructure for live Materialize tests.
//!
//! - Docker container management for a single-node Materialize
//! - Random object names so cases never collide
//! - A side channel for changing privileges behind the inspector's back

use mzgrant_catalog::{GrantInspector, MaterializeCatalog};
use sqlx::postgres::PgPoolOptions;
use std::process::Command;
use std::time::Duration;

// =============================================================================
// DOCKER CONTAINER CONFIGURATION
// =============================================================================

pub const CONTAINER_NAME: &str = "mzgrant_test_materialize";
pub const MATERIALIZE_PORT: u16 = 16875;
pub const MATERIALIZE_IMAGE: &str = "materialize/materialized:latest";

pub fn database_url() -> String {
    std::env::var("MZGRANT_TEST_DATABASE_URL").unwrap_or_else(|_| {
        format!(
            "postgres://materialize@localhost:{}/materialize?sslmode=disable",
            MATERIALIZE_PORT
        )
    })
}

// =============================================================================
// DOCKER CONTAINER MANAGEMENT
// =============================================================================

/// Start a Materialize container, replacing any leftover one.
pub fn start_materialize_container() -> Result<(), String> {
    let _ = Command::new("docker")
        .args(["rm", "-f", CONTAINER_NAME])
        .output();

    let status = Command::new("docker")
        .args([
            "run",
            "-d",
            "--name",
            CONTAINER_NAME,
            "-p",
            &format!("{}:6875", MATERIALIZE_PORT),
            MATERIALIZE_IMAGE,
        ])
        .status()
        .map_err(|e| format!("Failed to start container: {}", e))?;

    if !status.success() {
        return Err("Failed to start Materialize container".to_string());
    }
    Ok(())
}

pub fn stop_materialize_container() {
    let _ = Command::new("docker")
        .args(["rm", "-f", CONTAINER_NAME])
        .output();
}

/// Wait for Materialize to accept queries.
pub async fn wait_for_materialize() -> Result<MaterializeCatalog, String> {
    for attempt in 1..=60 {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url())
            .await;
        match pool {
            Ok(pool) => {
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    println!("✅ Materialize ready after {} attempts", attempt);
                    return Ok(MaterializeCatalog::from_pool(pool));
                }
            }
            Err(_) => {
                if attempt % 10 == 0 {
                    println!("⏳ Waiting for Materialize... (attempt {})", attempt);
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;
    }
    Err("Materialize did not become ready in time".to_string())
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub inspector: GrantInspector<MaterializeCatalog>,
    owns_container: bool,
}

impl TestContext {
    /// Use `MZGRANT_TEST_DATABASE_URL` when set, otherwise start a container.
    pub async fn setup() -> Result<Self, String> {
        let owns_container = std::env::var("MZGRANT_TEST_DATABASE_URL").is_err();
        if owns_container {
            start_materialize_container()?;
        }
        let catalog = wait_for_materialize().await?;
        Ok(Self {
            inspector: GrantInspector::new(catalog),
            owns_container,
        })
    }

    pub fn catalog(&self) -> &MaterializeCatalog {
        self.inspector.catalog()
    }

    /// Execute SQL directly, bypassing the inspector.
    pub async fn side_channel(&self, sql: &str) {
        self.catalog()
            .execute(sql)
            .await
            .unwrap_or_else(|e| panic!("side-channel SQL failed: {sql}: {e}"));
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if self.owns_container {
            stop_materialize_container();
        }
    }
}

/// A unique, lowercase identifier safe to use unquoted.
pub fn random_name(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
