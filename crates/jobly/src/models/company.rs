//! Companies.

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

/// Field → column translation for company updates.
pub const COMPANY_COLUMNS: ColumnMap<'static> =
    ColumnMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

/// Companies filter on name and head count; there is no flag dimension.
pub const COMPANY_FILTER: FilterColumns<'static> =
    FilterColumns::new(Some("name"), Some("num_employees"), None);

const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

const SELECT: &str = "SELECT handle, name, description, num_employees, logo_url FROM companies";
const RETURNING: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A job as listed on its company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for CompanyJob {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// A company with its open jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

/// Query-string search parameters for the company list.
///
/// `?name=net&minEmployees=100&maxEmployees=800`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearch {
    pub name: Option<String>,
    pub min_employees: Option<String>,
    pub max_employees: Option<String>,
}

impl CompanySearch {
    /// Coerce the raw parameters into filter criteria.
    ///
    /// Non-integer bounds and `minEmployees > maxEmployees` are bad requests.
    pub fn to_criteria(&self) -> JoblyResult<FilterCriteria> {
        let lower = parse_bound("minEmployees", present(&self.min_employees))?;
        let upper = parse_bound("maxEmployees", present(&self.max_employees))?;
        match (lower, upper) {
            (Some(min), Some(max)) if min > max => {
                return Err(JoblyError::bad_request(
                    "minEmployees cannot be greater than maxEmployees",
                ));
            }
            _ => {}
        }

        Ok(FilterCriteria {
            substring: present(&self.name).map(str::to_string),
            lower,
            upper,
            flag: false,
        })
    }
}

/// Company persistence.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company.
    ///
    /// Fails with [`JoblyError::Duplicate`] if the handle is taken.
    pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
        let existing = conn
            .query_opt_tagged(
                "company.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.handle],
            )
            .await?;
        if existing.is_some() {
            return Err(JoblyError::Duplicate(format!("company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RETURNING}"
        );
        let row = conn
            .query_one_tagged(
                "company.create",
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies ordered by name, optionally filtered.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> JoblyResult<Vec<Company>> {
        let rows = match build_filter_clause(criteria, &COMPANY_FILTER)? {
            Some(clause) => {
                let sql = format!("{SELECT} WHERE {clause} ORDER BY name");
                conn.query_tagged("company.find_all", &sql, &clause.params_ref())
                    .await?
            }
            None => {
                let sql = format!("{SELECT} ORDER BY name");
                conn.query_tagged("company.find_all", &sql, &[]).await?
            }
        };
        map_rows(&rows)
    }

    /// Fetch one company with its jobs (ordered by id, possibly none).
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("{SELECT} WHERE handle = $1");
        let row = conn
            .query_opt_tagged("company.get", &sql, &[&handle])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;

        let jobs = conn
            .query_tagged(
                "company.get.jobs",
                "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
                &[&handle],
            )
            .await?;

        Ok(CompanyDetail {
            company,
            jobs: map_rows(&jobs)?,
        })
    }

    /// Partially update a company.
    ///
    /// Accepts `name`, `description`, `numEmployees` and `logoUrl`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &FieldUpdate,
    ) -> JoblyResult<Company> {
        ensure_updatable(data, UPDATABLE)?;
        let clause = build_update_clause(data, &COMPANY_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {clause} WHERE handle = ${} RETURNING {RETURNING}",
            clause.next_placeholder()
        );
        let mut params: Vec<&(dyn ToSql + Sync)> = clause.params_ref();
        params.push(&handle);

        let row = conn
            .query_opt_tagged("company.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let affected = conn
            .execute_tagged(
                "company.remove",
                "DELETE FROM companies WHERE handle = $1",
                &[&handle],
            )
            .await?;
        if affected == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(name: Option<&str>, min: Option<&str>, max: Option<&str>) -> CompanySearch {
        CompanySearch {
            name: name.map(String::from),
            min_employees: min.map(String::from),
            max_employees: max.map(String::from),
        }
    }

    #[test]
    fn empty_search_has_no_criteria() {
        let criteria = CompanySearch::default().to_criteria().unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn search_coerces_bounds() {
        let criteria = search(Some("net"), Some("100"), Some("800")).to_criteria().unwrap();
        assert_eq!(
            criteria,
            FilterCriteria::new().substring("net").lower(100).upper(800)
        );
    }

    #[test]
    fn search_rejects_inverted_range() {
        let err = search(None, Some("10"), Some("2")).to_criteria().unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn search_rejects_non_numeric_bound() {
        let err = search(None, None, Some("many")).to_criteria().unwrap_err();
        assert!(matches!(err, JoblyError::BadRequest(_)));
    }

    #[test]
    fn search_rejects_bound_too_large_for_integer_column() {
        let err = search(None, Some("3000000000"), None).to_criteria().unwrap_err();
        assert!(matches!(err, JoblyError::BadRequest(ref m) if m.contains("minEmployees")));
    }

    #[test]
    fn search_bounds_bind_to_int4() {
        use bytes::BytesMut;
        use tokio_postgres::types::Type;

        let criteria = search(None, Some("2147483647"), None).to_criteria().unwrap();
        let clause = build_filter_clause(&criteria, &COMPANY_FILTER).unwrap().unwrap();
        let mut buf = BytesMut::new();
        assert!(clause.values()[0].to_sql_checked(&Type::INT4, &mut buf).is_ok());
    }

    #[test]
    fn search_from_query_names() {
        let search: CompanySearch =
            serde_json::from_str(r#"{"name": "c", "minEmployees": "2"}"#).unwrap();
        let criteria = search.to_criteria().unwrap();
        let clause = build_filter_clause(&criteria, &COMPANY_FILTER).unwrap().unwrap();
        assert_eq!(clause.to_sql(), r#""name" ILIKE $1 AND "num_employees" >= $2"#);
    }

    #[test]
    fn update_columns_translate_camel_case() {
        let fields = FieldUpdate::new()
            .set("name", "New")
            .set("numEmployees", 10)
            .set("logoUrl", "http://new.img");
        let clause = build_update_clause(&fields, &COMPANY_COLUMNS).unwrap();
        assert_eq!(
            clause.to_sql(),
            r#""name"=$1, "num_employees"=$2, "logo_url"=$3"#
        );
        assert_eq!(clause.next_placeholder(), 4);
    }

    #[test]
    fn company_serializes_camel_case() {
        let company = Company {
            handle: "c1".into(),
            name: "C1".into(),
            description: "Desc1".into(),
            num_employees: Some(1),
            logo_url: None,
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["numEmployees"], 1);
        assert!(json["logoUrl"].is_null());
    }
}
