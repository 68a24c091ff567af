//! # jobly
//!
//! Data layer for the Jobly jobs board, on top of `tokio-postgres`.
//!
//! ## Features
//!
//! - **Filter clauses**: turn loosely-typed search filters into a parameterized
//!   `WHERE` clause driven by a declarative table of recognized filters
//! - **Partial updates**: turn a JSON object of changed fields into a `SET`
//!   clause with contiguous `$N` placeholders
//! - **Filter validation**: reject bad employee and salary bounds before any
//!   SQL is built
//! - **Models**: company and job CRUD over any `GenericClient`, pooled
//!   connection or transaction alike
//! - **Auth**: HS256 token verification and route guards
//!
//! ## Filtering
//!
//! ```
//! use jobly::filter::{FilterRequest, JOB_FILTERS, build_filter_clause};
//!
//! let mut filters = FilterRequest::new();
//! filters.insert("minSalary", 50000).insert("hasEquity", true);
//!
//! let clause = build_filter_clause(&filters, &JOB_FILTERS).unwrap();
//! assert_eq!(clause.clause, "WHERE salary >= $1 AND equity IS NOT NULL");
//! ```
//!
//! ## Partial updates
//!
//! ```
//! let data = serde_json::json!({"numEmployees": 10, "name": "Acme"});
//! let set = jobly::build_set_clause(
//!     data.as_object().unwrap(),
//!     &[("numEmployees", "num_employees")],
//! )
//! .unwrap();
//! assert_eq!(set.clause, r#""num_employees"=$1, "name"=$2"#);
//! ```

pub mod auth;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod prelude;
pub mod row;
pub mod validate;
pub mod value;

pub use auth::Claims;
pub use builder::{FilterClause, SetClause, UpdateRequest, WhereBuilder, build_set_clause};
pub use client::GenericClient;
pub use config::JoblyConfig;
pub use error::{JoblyError, JoblyResult};
pub use filter::{
    COMPANY_FILTERS, FilterRequest, FilterSpec, JOB_FILTERS, build_filter_clause,
    build_filter_clause_from,
};
pub use models::{Company, CompanyDetail, Job, NewCompany, NewJob};
pub use row::{FromRow, RowExt};
pub use validate::{validate_company_filters, validate_job_filters};
pub use value::{BoundValue, FilterValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config};
