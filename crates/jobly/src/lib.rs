//! # jobly
//!
//! Query construction and data access for the Jobly companies/jobs schema.
//!
//! ## Features
//!
//! - **Partial updates**: [`build_update_clause`] turns an ordered
//!   [`FieldUpdate`] into `"col"=$1, "other"=$2` plus bind values
//! - **Dynamic filters**: [`build_filter_clause`] composes `ILIKE` / range /
//!   flag predicates from whichever [`FilterCriteria`] are present
//! - **Safe identifiers**: columns are always emitted quoted, with `"` escaped
//! - **Transaction-friendly**: repositories accept any [`GenericClient`]
//! - **Observable**: [`TracingClient`] logs every statement through `tracing`
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{CompanyRepo, CompanySearch, FieldUpdate};
//!
//! let search = CompanySearch { name: Some("net".into()), ..Default::default() };
//! let companies = CompanyRepo::find_all(&client, &search.to_criteria()?).await?;
//!
//! let patch = FieldUpdate::new().set("numEmployees", 120).set("logoUrl", None::<String>);
//! let company = CompanyRepo::update(&client, "acme", &patch).await?;
//! ```

pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod models;
pub mod row;
pub mod schema;
pub mod trace;
pub mod value;

pub use clause::{
    Clause, ColumnMap, Connective, FieldUpdate, FilterColumns, FilterCriteria,
    build_filter_clause, build_update_clause,
};
pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use error::{JoblyError, JoblyResult};
pub use ident::quote_column;
pub use models::{
    Company, CompanyDetail, CompanyJob, CompanyRepo, CompanySearch, Job, JobRepo, JobSearch,
    NewCompany, NewJob,
};
pub use row::{FromRow, RowExt};
pub use trace::TracingClient;
pub use value::Value;
