//! Shared setup for database-backed tests.
//!
//! Each test opens its own connection, starts a transaction, creates a
//! private schema inside it and rolls everything back at the end.

#![allow(dead_code)]

use jobly::{DatabaseConfig, JoblyError, JoblyResult, schema};
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::{NoTls, Transaction};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Connect to the test database, or `None` (after a notice) when unset.
pub async fn connect(test: &str) -> JoblyResult<Option<tokio_postgres::Client>> {
    init_tracing();
    let Some(url) = DatabaseConfig::test_url() else {
        eprintln!("TEST_DATABASE_URL / DATABASE_URL is not set; skipping {test}");
        return Ok(None);
    };

    let (client, connection) = tokio_postgres::connect(&url, NoTls)
        .await
        .map_err(|e| JoblyError::Connection(e.to_string()))?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(Some(client))
}

/// Create a private schema in `tx`, install the tables and load fixtures.
///
/// Companies `c1..c3` (`C1..C3`, 1..3 employees) and jobs
/// `j1` (c1, 2222, 0), `j2` (c2, 3333, 0), `j3` (c3, 4444, 0.1).
pub async fn seed(tx: &Transaction<'_>) -> JoblyResult<()> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let schema_name = format!("jobly_test_{}_{}", std::process::id(), nanos);
    tx.batch_execute(&format!(
        "CREATE SCHEMA {schema_name}; SET LOCAL search_path TO {schema_name}"
    ))
    .await
    .map_err(JoblyError::from_db_error)?;

    schema::install(tx).await?;

    tx.batch_execute(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img');
         INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('j1', 2222, 0, 'c1'),
                ('j2', 3333, 0, 'c2'),
                ('j3', 4444, 0.1, 'c3');",
    )
    .await
    .map_err(JoblyError::from_db_error)?;
    Ok(())
}
