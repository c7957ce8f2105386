//! `tracing` instrumentation for any [`GenericClient`].

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use std::borrow::Cow;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Tag used for statements issued through the untagged methods.
const UNTAGGED: &str = "-";

/// A client wrapper that emits one `tracing` event per statement.
///
/// Events go to target `jobly.sql` with the statement tag, parameter count,
/// row count, elapsed time and the SQL (truncated to `max_sql_length` chars).
/// Failed statements are always reported at `WARN`.
///
/// ```ignore
/// let client = TracingClient::new(&client).level(Level::INFO);
/// let companies = CompanyRepo::find_all(&client, &criteria).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    inner: C,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<C: GenericClient> TracingClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the event level for successful statements.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Level used for successful statements.
    pub fn event_level(&self) -> Level {
        self.level
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                Cow::Owned(format!("{}...", &sql[..end]))
            }
            _ => Cow::Borrowed(sql),
        }
    }

    fn record(
        &self,
        tag: &str,
        sql: &str,
        param_count: usize,
        elapsed: Duration,
        outcome: Result<u64, &JoblyError>,
    ) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        match outcome {
            Ok(rows) => emit_at_level!(
                self.level,
                target: "jobly.sql",
                tag,
                param_count,
                rows,
                elapsed_ms,
                sql = %sql,
            ),
            Err(error) => tracing::warn!(
                target: "jobly.sql",
                tag,
                param_count,
                elapsed_ms,
                sql = %sql,
                error = %error,
                "statement failed"
            ),
        }
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.query_tagged(UNTAGGED, sql, params).await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.inner.query_tagged(tag, sql, params).await;
        self.record(
            tag,
            sql,
            params.len(),
            start.elapsed(),
            result.as_ref().map(|rows| rows.len() as u64),
        );
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.execute_tagged(UNTAGGED, sql, params).await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<u64> {
        let start = Instant::now();
        let result = self.inner.execute_tagged(tag, sql, params).await;
        self.record(
            tag,
            sql,
            params.len(),
            start.elapsed(),
            result.as_ref().copied(),
        );
        result
    }
}
