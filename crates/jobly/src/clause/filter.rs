//! WHERE-list composer for list queries.

use crate::clause::{Clause, ClauseWriter, Connective};
use crate::error::{JoblyError, JoblyResult};
use crate::value::Value;

/// Optional search criteria. Absent dimensions add no predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive "contains" match on the text column.
    pub substring: Option<String>,
    /// Inclusive lower bound on the numeric column.
    pub lower: Option<i64>,
    /// Inclusive upper bound on the numeric column.
    pub upper: Option<i64>,
    /// Only rows whose flag column is non-zero. `false` means no constraint.
    pub flag: bool,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substring(mut self, s: impl Into<String>) -> Self {
        self.substring = Some(s.into());
        self
    }

    pub fn lower(mut self, bound: i64) -> Self {
        self.lower = Some(bound);
        self
    }

    pub fn upper(mut self, bound: i64) -> Self {
        self.upper = Some(bound);
        self
    }

    pub fn flag(mut self, flag: bool) -> Self {
        self.flag = flag;
        self
    }

    /// True when no dimension constrains the query.
    pub fn is_empty(&self) -> bool {
        self.substring.is_none() && self.lower.is_none() && self.upper.is_none() && !self.flag
    }
}

/// Storage columns behind each filter dimension of one table.
///
/// `None` marks a dimension the table cannot be filtered on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterColumns<'a> {
    /// Column for the substring match.
    pub text: Option<&'a str>,
    /// Column for the lower and upper bounds.
    pub numeric: Option<&'a str>,
    /// Column for the non-zero flag.
    pub flag: Option<&'a str>,
}

impl<'a> FilterColumns<'a> {
    pub const fn new(text: Option<&'a str>, numeric: Option<&'a str>, flag: Option<&'a str>) -> Self {
        Self {
            text,
            numeric,
            flag,
        }
    }
}

/// Compose the predicate list for `WHERE <clause>`.
///
/// Returns `Ok(None)` when `criteria` constrains nothing; the caller then runs
/// its unfiltered query. Otherwise predicates are appended in a fixed order,
/// substring, lower bound, upper bound, flag, sharing one placeholder
/// sequence, and joined with `AND`:
///
/// | criterion | fragment               | value      |
/// |-----------|------------------------|------------|
/// | substring | `"<text>" ILIKE $N`    | `%<s>%`    |
/// | lower     | `"<numeric>" >= $N`    | bound      |
/// | upper     | `"<numeric>" <= $N`    | bound      |
/// | flag      | `"<flag>" <> $N`       | `0`        |
///
/// # Errors
///
/// [`JoblyError::BadRequest`] when a criterion is present for a dimension
/// `columns` does not map.
pub fn build_filter_clause(
    criteria: &FilterCriteria,
    columns: &FilterColumns<'_>,
) -> JoblyResult<Option<Clause>> {
    if criteria.is_empty() {
        return Ok(None);
    }

    let mut writer = ClauseWriter::with_capacity(4);

    if let Some(substring) = &criteria.substring {
        let column = require(columns.text, "text search")?;
        writer.push(column, " ILIKE ", Value::Text(format!("%{substring}%")))?;
    }
    if let Some(lower) = criteria.lower {
        let column = require(columns.numeric, "lower bound")?;
        writer.push(column, " >= ", Value::Int(lower))?;
    }
    if let Some(upper) = criteria.upper {
        let column = require(columns.numeric, "upper bound")?;
        writer.push(column, " <= ", Value::Int(upper))?;
    }
    if criteria.flag {
        let column = require(columns.flag, "flag")?;
        writer.push(column, " <> ", Value::Int(0))?;
    }

    Ok(Some(writer.finish(Connective::And)))
}

fn require<'a>(column: Option<&'a str>, dimension: &str) -> JoblyResult<&'a str> {
    column.ok_or_else(|| JoblyError::bad_request(format!("Filtering by {dimension} is not supported")))
}
