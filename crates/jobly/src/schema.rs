//! Table definitions for companies and jobs.

use crate::client::GenericClient;
use crate::error::JoblyResult;

/// DDL statements, in dependency order.
pub const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
)"#,
    r#"CREATE TABLE IF NOT EXISTS jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL
        REFERENCES companies ON DELETE CASCADE
)"#,
];

/// Create the tables if they do not exist yet.
pub async fn install(conn: &impl GenericClient) -> JoblyResult<()> {
    for statement in STATEMENTS {
        conn.execute_tagged("schema.install", statement, &[]).await?;
    }
    Ok(())
}
