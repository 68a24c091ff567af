use super::job::Job;
use super::{ensure_updatable, params_ref};
use crate::builder::{UpdateRequest, build_set_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{COMPANY_FILTERS, FilterRequest, build_filter_clause};
use crate::row::{FromRow, RowExt};
use crate::validate::validate_company_filters;
use crate::value::BoundValue;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Fields a partial update may touch, by their request names.
const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

/// Request name -> column.
const COLUMN_ALIASES: &[(&str, &str)] = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// A company together with its open jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

pub(crate) fn find_all_sql(filters: &FilterRequest) -> (String, Vec<BoundValue>) {
    match build_filter_clause(filters, &COMPANY_FILTERS) {
        Some(filter) => (
            format!(
                "SELECT {COMPANY_COLUMNS} FROM companies {} ORDER BY name",
                filter.clause
            ),
            filter.values,
        ),
        None => (
            format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name"),
            Vec::new(),
        ),
    }
}

pub(crate) fn update_sql(data: &UpdateRequest) -> JoblyResult<(String, Vec<BoundValue>)> {
    ensure_updatable(data, UPDATABLE)?;
    let set = build_set_clause(data, COLUMN_ALIASES)?;
    let sql = format!(
        "UPDATE companies SET {} WHERE handle = ${} RETURNING {COMPANY_COLUMNS}",
        set.clause,
        set.next_placeholder()
    );
    Ok((sql, set.values))
}

impl Company {
    /// Create a company.
    ///
    /// Fails with `BadRequest` if the handle is taken.
    pub async fn create(conn: &impl GenericClient, company: &NewCompany) -> JoblyResult<Company> {
        let duplicate = conn
            .query_opt_tagged(
                "companies.create.duplicate_check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&company.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                company.handle
            )));
        }

        let row = conn
            .query_one_tagged(
                "companies.create",
                &format!(
                    "INSERT INTO companies ({COMPANY_COLUMNS}) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS}"
                ),
                &[
                    &company.handle,
                    &company.name,
                    &company.description,
                    &company.num_employees,
                    &company.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// Companies matching `filters` (`minEmployees`, `maxEmployees`, `name`),
    /// ordered by name.
    ///
    /// The range filters are validated first; unknown filters are ignored.
    pub async fn find_all(
        conn: &impl GenericClient,
        filters: &FilterRequest,
    ) -> JoblyResult<Vec<Company>> {
        validate_company_filters(filters)
            .inspect_err(|e| tracing::debug!(error = %e, "rejected company filters"))?;

        let (sql, values) = find_all_sql(filters);
        let rows = conn
            .query_tagged("companies.find_all", &sql, &params_ref(&values))
            .await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// A company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let row = conn
            .query_opt_tagged(
                "companies.get",
                &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"),
                &[&handle],
            )
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;

        let rows = conn
            .query_tagged(
                "companies.get.jobs",
                "SELECT id, title, salary, CAST(equity AS FLOAT) AS equity, company_handle \
                 FROM jobs WHERE company_handle = $1 ORDER BY id",
                &[&handle],
            )
            .await?;
        let jobs = rows.iter().map(Job::from_row).collect::<JoblyResult<_>>()?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Update some of `name`, `description`, `numEmployees` and `logoUrl`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &UpdateRequest,
    ) -> JoblyResult<Company> {
        let (sql, values) = update_sql(data)?;
        let mut params = params_ref(&values);
        params.push(&handle);

        let row = conn
            .query_opt_tagged("companies.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company; its jobs go with it.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        conn.query_opt_tagged(
            "companies.remove",
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
            &[&handle],
        )
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Ok(())
    }
}
