//! Jobs.

use super::{ensure_updatable, parse_bound, present};
use crate::clause::{
    ColumnMap, FieldUpdate, FilterColumns, FilterCriteria, build_filter_clause,
    build_update_clause,
};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt, map_rows};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Job fields are stored under their own names.
pub const JOB_COLUMNS: ColumnMap<'static> = ColumnMap::EMPTY;

/// Jobs filter on title, minimum salary and "has equity".
pub const JOB_FILTER: FilterColumns<'static> =
    FilterColumns::new(Some("title"), Some("salary"), Some("equity"));

const UPDATABLE: &[&str] = &["title", "salary", "equity"];

const SELECT: &str = "SELECT id, title, salary, equity, company_handle FROM jobs";
const RETURNING: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Query-string search parameters for the job list.
///
/// `?title=engineer&minSalary=50000&hasEquity=true`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearch {
    pub title: Option<String>,
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
}

impl JobSearch {
    /// Coerce the raw parameters into filter criteria.
    ///
    /// `hasEquity` only constrains the query when it is exactly `"true"`.
    pub fn to_criteria(&self) -> JoblyResult<FilterCriteria> {
        Ok(FilterCriteria {
            substring: present(&self.title).map(str::to_string),
            lower: parse_bound("minSalary", present(&self.min_salary))?,
            upper: None,
            flag: self.has_equity.as_deref() == Some("true"),
        })
    }
}

/// Job persistence.
pub struct JobRepo;

impl JobRepo {
    /// Insert a job.
    ///
    /// Fails with [`JoblyError::Duplicate`] if the company already lists a
    /// job with the same title.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
        let existing = conn
            .query_opt_tagged(
                "job.create.check",
                "SELECT id FROM jobs WHERE title = $1 AND company_handle = $2",
                &[&data.title, &data.company_handle],
            )
            .await?;
        if existing.is_some() {
            return Err(JoblyError::Duplicate(format!("job: {}", data.title)));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {RETURNING}"
        );
        let row = conn
            .query_one_tagged(
                "job.create",
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs ordered by id, optionally filtered.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> JoblyResult<Vec<Job>> {
        let rows = match build_filter_clause(criteria, &JOB_FILTER)? {
            Some(clause) => {
                let sql = format!("{SELECT} WHERE {clause} ORDER BY id");
                conn.query_tagged("job.find_all", &sql, &clause.params_ref())
                    .await?
            }
            None => {
                let sql = format!("{SELECT} ORDER BY id");
                conn.query_tagged("job.find_all", &sql, &[]).await?
            }
        };
        map_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("{SELECT} WHERE id = $1");
        let row = conn
            .query_opt_tagged("job.get", &sql, &[&id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Partially update a job.
    ///
    /// Accepts `title`, `salary` and `equity`; the id and the owning company
    /// are fixed.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &FieldUpdate) -> JoblyResult<Job> {
        ensure_updatable(data, UPDATABLE)?;
        let clause = build_update_clause(data, &JOB_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {clause} WHERE id = ${} RETURNING {RETURNING}",
            clause.next_placeholder()
        );
        let mut params: Vec<&(dyn ToSql + Sync)> = clause.params_ref();
        params.push(&id);

        let row = conn
            .query_opt_tagged("job.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let affected = conn
            .execute_tagged("job.remove", "DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if affected == 0 {
            return Err(JoblyError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn has_equity_only_for_literal_true() {
        for (raw, expected) in [(Some("true"), true), (Some("false"), false), (Some("1"), false), (None, false)] {
            let search = JobSearch {
                has_equity: raw.map(String::from),
                ..JobSearch::default()
            };
            assert_eq!(search.to_criteria().unwrap().flag, expected, "hasEquity={raw:?}");
        }
    }

    #[test]
    fn search_builds_title_salary_equity_clause() {
        let search: JobSearch =
            serde_json::from_str(r#"{"title": "j", "minSalary": "4000", "hasEquity": "true"}"#)
                .unwrap();
        let criteria = search.to_criteria().unwrap();
        let clause = build_filter_clause(&criteria, &JOB_FILTER).unwrap().unwrap();

        assert_eq!(
            clause.to_sql(),
            r#""title" ILIKE $1 AND "salary" >= $2 AND "equity" <> $3"#
        );
        assert_eq!(
            clause.values(),
            [Value::from("%j%"), Value::Int(4000), Value::Int(0)]
        );
    }

    #[test]
    fn search_rejects_bad_salary() {
        let search = JobSearch {
            min_salary: Some("lots".into()),
            ..JobSearch::default()
        };
        assert!(search.to_criteria().unwrap_err().is_bad_request());
    }

    #[test]
    fn search_rejects_salary_too_large_for_integer_column() {
        let search = JobSearch {
            min_salary: Some("3000000000".into()),
            ..JobSearch::default()
        };
        assert!(search.to_criteria().unwrap_err().is_bad_request());
    }

    #[test]
    fn update_uses_field_names_as_columns() {
        let fields = FieldUpdate::new().set("salary", 5000).set("equity", "0.2");
        let clause = build_update_clause(&fields, &JOB_COLUMNS).unwrap();
        assert_eq!(clause.to_sql(), r#""salary"=$1, "equity"=$2"#);
    }

    #[test]
    fn new_job_accepts_string_equity() {
        let job: NewJob = serde_json::from_str(
            r#"{"title": "t1", "salary": 9999, "equity": "0", "company_handle": "c1"}"#,
        )
        .unwrap();
        assert_eq!(job.equity, Some(Decimal::ZERO));
        assert_eq!(job.salary, Some(9999));
    }
}
