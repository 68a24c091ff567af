//! Data access for jobs and companies.
//!
//! Every method takes any [`GenericClient`](crate::GenericClient), so the same
//! code runs on a pooled connection or inside a transaction.

pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, NewJob};

use crate::builder::UpdateRequest;
use crate::error::{JoblyError, JoblyResult};
use crate::value::BoundValue;
use tokio_postgres::types::ToSql;

/// Reject update fields outside `allowed` before they reach the SET builder,
/// which does not escape column names.
pub(crate) fn ensure_updatable(data: &UpdateRequest, allowed: &[&str]) -> JoblyResult<()> {
    match data.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => {
            tracing::debug!(field = %key, "rejected update field");
            Err(JoblyError::bad_request(format!("{key} cannot be updated")))
        }
        None => Ok(()),
    }
}

pub(crate) fn params_ref(values: &[BoundValue]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}
