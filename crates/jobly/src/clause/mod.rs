//! Parameterized clause fragments.
//!
//! Two builders produce [`Clause`] values that a data-access layer splices
//! into a statement template it already owns:
//!
//! - [`build_update_clause`]: `"col"=$1, "other"=$2` for `UPDATE ... SET`
//! - [`build_filter_clause`]: `"name" ILIKE $1 AND "num_employees" >= $2` for `WHERE`
//!
//! Placeholder numbering is computed per call while fragments are appended,
//! so identical input always yields byte-identical output.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{ColumnMap, FieldUpdate, build_update_clause};
//!
//! let fields = FieldUpdate::new().set("firstName", "Aliya").set("age", 32);
//! let clause = build_update_clause(&fields, &ColumnMap::new(&[("firstName", "first_name")]))?;
//! assert_eq!(clause.to_sql(), r#""first_name"=$1, "age"=$2"#);
//!
//! let sql = format!("UPDATE users SET {} WHERE id = ${}", clause, clause.next_placeholder());
//! ```

mod filter;
mod update;


pub use filter::{FilterColumns, FilterCriteria, build_filter_clause};
pub use update::{ColumnMap, FieldUpdate, build_update_clause};

use crate::error::JoblyResult;
use crate::ident::write_quoted;
use crate::value::Value;
use std::fmt;
use tokio_postgres::types::ToSql;

/// How the fragments of a [`Clause`] are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `, ` (assignment lists)
    Comma,
    /// ` AND ` (predicate lists)
    And,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::Comma => ", ",
            Connective::And => " AND ",
        }
    }
}

/// Ordered fragments with their bind values.
///
/// Invariant: `fragments().len() == values().len()` and placeholder `$i`
/// binds `values()[i - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    fragments: Vec<String>,
    values: Vec<Value>,
    connective: Connective,
}

impl Clause {
    /// The individual fragments, in placeholder order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The bind values, in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The 1-based index of the first placeholder *after* this clause.
    ///
    /// Callers use it to number parameters they append to the statement,
    /// e.g. the key in `UPDATE ... SET <clause> WHERE handle = $N`.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Fragments joined with the connective.
    pub fn to_sql(&self) -> String {
        self.fragments.join(self.connective.as_str())
    }

    /// Bind values as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Split into the joined SQL and the bind values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        let sql = self.to_sql();
        (sql, self.values)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str(self.connective.as_str())?;
            }
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

/// Per-call accumulator that numbers placeholders as fragments are pushed.
#[derive(Debug, Default)]
pub(crate) struct ClauseWriter {
    fragments: Vec<String>,
    values: Vec<Value>,
}

impl ClauseWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append `"<column>"<op>$N` binding `value`, returning N.
    pub(crate) fn push(&mut self, column: &str, op: &str, value: Value) -> JoblyResult<usize> {
        let idx = self.values.len() + 1;
        let mut fragment = String::with_capacity(column.len() + op.len() + 6);
        write_quoted(column, &mut fragment)?;
        fragment.push_str(op);
        fragment.push('$');
        fragment.push_str(&idx.to_string());

        self.fragments.push(fragment);
        self.values.push(value);
        Ok(idx)
    }

    pub(crate) fn finish(self, connective: Connective) -> Clause {
        Clause {
            fragments: self.fragments,
            values: self.values,
            connective,
        }
    }
}
