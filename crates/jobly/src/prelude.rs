//! Common imports for handlers built on `jobly`.
//!
//! ```ignore
//! use jobly::prelude::*;
//! ```

pub use crate::{
    BoundValue, Claims, Company, CompanyDetail, FilterRequest, FilterValue, FromRow,
    GenericClient, Job, JoblyError, JoblyResult, NewCompany, NewJob, RowExt, UpdateRequest,
    build_filter_clause, build_set_clause,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_from_config};
