//! Embedded PostgreSQL for Diesel adapter tests.
//!
//! Every call starts a `pg-embed-setup-unpriv` cluster, creates a uniquely
//! named database on it and applies the crate's migrations. When the cluster
//! cannot start (no binaries, no network) the caller gets `None` and the test
//! prints a `SKIP-TEST-CLUSTER` marker. Set `RECIPES_REQUIRE_TEST_CLUSTER=1`
//! in CI to turn that into a failure.
//!
//! Installation and data directories default to `/var/tmp`; unless
//! `PG_RUNTIME_DIR` and `PG_DATA_DIR` are both set they are pointed at the
//! target directory for the duration of the bootstrap.

use std::path::PathBuf;

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use pg_embedded_setup_unpriv::TestCluster;
use recipe_backend::outbound::persistence::run_pending_migrations;
use tokio::runtime::Runtime;
use uuid::Uuid;

const REQUIRE_CLUSTER_ENV: &str = "RECIPES_REQUIRE_TEST_CLUSTER";

/// A migrated database on a running cluster, plus a runtime to drive the
/// async adapters from synchronous tests.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub url: String,
    _cluster: TestCluster,
}

fn cluster_required() -> bool {
    std::env::var(REQUIRE_CLUSTER_ENV)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn workspace_dirs() -> std::io::Result<(String, String)> {
    let target = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"));
    let base = target
        .join("pg-embed")
        .join(format!("cluster-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

fn start_cluster() -> Result<TestCluster, String> {
    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) = workspace_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };
    TestCluster::new().map_err(|err| format!("start cluster: {err:?}"))
}

fn create_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("recipes_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut conn = PgConnection::establish(&admin_url).map_err(|err| format!("connect: {err}"))?;
    diesel::sql_query(format!("CREATE DATABASE \"{name}\""))
        .execute(&mut conn)
        .map_err(|err| format!("create database: {err}"))?;
    Ok(cluster.connection().database_url(&name))
}

fn setup() -> Result<TestDatabase, String> {
    let cluster = start_cluster()?;
    let url = create_database(&cluster)?;
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|err| err.to_string())?;
    Ok(TestDatabase {
        runtime,
        url,
        _cluster: cluster,
    })
}

/// A fresh migrated database, or `None` when no cluster is available.
pub fn test_database() -> Option<TestDatabase> {
    match setup() {
        Ok(database) => Some(database),
        Err(reason) if cluster_required() => {
            panic!("test cluster setup failed: {reason}; unset {REQUIRE_CLUSTER_ENV} to skip")
        }
        Err(reason) => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
    }
}
