use super::{ensure_updatable, params_ref};
use crate::builder::{UpdateRequest, build_set_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{FilterRequest, JOB_FILTERS, build_filter_clause};
use crate::row::{FromRow, RowExt};
use crate::validate::validate_job_filters;
use crate::value::BoundValue;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const JOB_COLUMNS: &str =
    "id, title, salary, CAST(equity AS FLOAT) AS equity, company_handle";

/// Fields a partial update may touch.
const UPDATABLE: &[&str] = &["title", "salary", "equity"];

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
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

/// Data for a new job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

/// Render the listing query for `filters`.
pub(crate) fn filter_sql(filters: &FilterRequest) -> (String, Vec<BoundValue>) {
    match build_filter_clause(filters, &JOB_FILTERS) {
        Some(filter) => (
            format!("SELECT {JOB_COLUMNS} FROM jobs {} ORDER BY title", filter.clause),
            filter.values,
        ),
        None => (format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY title"), Vec::new()),
    }
}

/// Render the partial update; the job id binds to the placeholder after the
/// SET values.
pub(crate) fn update_sql(data: &UpdateRequest) -> JoblyResult<(String, Vec<BoundValue>)> {
    ensure_updatable(data, UPDATABLE)?;
    let set = build_set_clause(data, &[])?;
    let sql = format!(
        "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
        set.clause,
        set.next_placeholder()
    );
    Ok((sql, set.values))
}

impl Job {
    /// Create a job.
    ///
    /// Fails with `BadRequest` if the company already has a job with this title.
    pub async fn create(conn: &impl GenericClient, job: &NewJob) -> JoblyResult<Job> {
        let duplicate = conn
            .query_opt_tagged(
                "jobs.create.duplicate_check",
                "SELECT id FROM jobs WHERE company_handle = $1 AND title = $2",
                &[&job.company_handle, &job.title],
            )
            .await?;
        if duplicate.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate job: {} at {}",
                job.title, job.company_handle
            )));
        }

        let salary = BoundValue::from(job.salary);
        let equity = BoundValue::from(job.equity);
        let row = conn
            .query_one_tagged(
                "jobs.create",
                &format!(
                    "INSERT INTO jobs (title, salary, equity, company_handle) \
                     VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
                ),
                &[&job.title, &salary, &equity, &job.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// All jobs, ordered by title.
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<Job>> {
        Self::filter(conn, &FilterRequest::new()).await
    }

    /// Jobs matching `filters` (`minSalary`, `hasEquity`, `title`), ordered by
    /// title. Unknown filters are ignored.
    pub async fn filter(conn: &impl GenericClient, filters: &FilterRequest) -> JoblyResult<Vec<Job>> {
        validate_job_filters(filters)
            .inspect_err(|e| tracing::debug!(error = %e, "rejected job filters"))?;

        let (sql, values) = filter_sql(filters);
        let rows = conn
            .query_tagged("jobs.filter", &sql, &params_ref(&values))
            .await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// A single job.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let row = conn
            .query_opt_tagged(
                "jobs.get",
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"),
                &[&id],
            )
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job with id: {id}")))?;
        Job::from_row(&row)
    }

    /// Update some of `title`, `salary` and `equity`.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        data: &UpdateRequest,
    ) -> JoblyResult<Job> {
        let (sql, values) = update_sql(data)?;
        let mut params = params_ref(&values);
        params.push(&id);

        let row = conn
            .query_opt_tagged("jobs.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job with id: {id}")))?;
        Job::from_row(&row)
    }

    /// Delete a job.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        conn.query_opt_tagged("jobs.remove", "DELETE FROM jobs WHERE id = $1 RETURNING id", &[&id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job with id: {id}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_sql_without_filters() {
        let (sql, values) = filter_sql(&FilterRequest::new());
        assert_eq!(
            sql,
            "SELECT id, title, salary, CAST(equity AS FLOAT) AS equity, company_handle \
             FROM jobs ORDER BY title"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn filter_sql_embeds_clause() {
        let mut filters = FilterRequest::new();
        filters
            .insert("minSalary", 50000)
            .insert("hasEquity", true)
            .insert("title", "Analyst");
        let (sql, values) = filter_sql(&filters);
        assert!(sql.ends_with(
            "FROM jobs WHERE salary >= $1 AND equity IS NOT NULL AND LOWER(title) ILIKE $2 \
             ORDER BY title"
        ));
        assert_eq!(
            values,
            vec![BoundValue::Int(50000), BoundValue::from("%analyst%")]
        );
    }

    #[test]
    fn update_sql_puts_id_after_set_values() {
        let data = json!({"title": "Engineer", "equity": 0.1});
        let (sql, values) = update_sql(data.as_object().unwrap()).unwrap();
        assert!(sql.starts_with(r#"UPDATE jobs SET "title"=$1, "equity"=$2 WHERE id = $3"#));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn update_sql_rejects_company_change() {
        let data = json!({"companyHandle": "c2"});
        assert!(matches!(
            update_sql(data.as_object().unwrap()),
            Err(JoblyError::BadRequest(_))
        ));
    }

    #[test]
    fn update_sql_empty() {
        assert!(matches!(
            update_sql(&UpdateRequest::new()),
            Err(JoblyError::EmptyInput)
        ));
    }

    #[test]
    fn job_serializes_camel_case() {
        let job = Job {
            id: 1,
            title: "J1".to_string(),
            salary: Some(1),
            equity: Some(0.1),
            company_handle: "c1".to_string(),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["companyHandle"], "c1");
    }
}
