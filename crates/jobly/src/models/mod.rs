//! Companies and jobs data-access layer.
//!
//! Each repository owns its statement templates and splices in the clauses
//! produced by [`build_update_clause`](crate::build_update_clause) and
//! [`build_filter_clause`](crate::build_filter_clause).
//!
//! List queries return an empty `Vec` when nothing matches; only single-row
//! lookups, updates and deletes report [`JoblyError::NotFound`].

mod company;
mod job;

pub use company::{
    COMPANY_COLUMNS, COMPANY_FILTER, Company, CompanyDetail, CompanyJob, CompanyRepo,
    CompanySearch, NewCompany,
};
pub use job::{JOB_COLUMNS, JOB_FILTER, Job, JobRepo, JobSearch, NewJob};

use crate::clause::FieldUpdate;
use crate::error::{JoblyError, JoblyResult};

/// Reject fields a caller may not change through a partial update.
fn ensure_updatable(fields: &FieldUpdate, allowed: &[&str]) -> JoblyResult<()> {
    match fields.fields().find(|field| !allowed.contains(field)) {
        Some(field) => Err(JoblyError::bad_request(format!(
            "Field \"{field}\" cannot be updated"
        ))),
        None => Ok(()),
    }
}

/// A query-string parameter, treating the empty string as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Coerce a query-string bound to an integer.
///
/// The filtered columns are `INTEGER`, so bounds outside `i32` are rejected
/// here rather than at bind time.
fn parse_bound(name: &str, value: Option<&str>) -> JoblyResult<Option<i64>> {
    value
        .map(|v| {
            v.trim().parse::<i32>().map(i64::from).map_err(|_| {
                JoblyError::bad_request(format!("{name} must be a 32-bit integer, got {v:?}"))
            })
        })
        .transpose()
}
