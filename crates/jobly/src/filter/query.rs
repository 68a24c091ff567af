use super::FilterRequest;
use crate::value::FilterValue;
use serde::Deserialize;

/// Typed view of the `GET /jobs` query string.
///
/// Unknown parameters are ignored, matching [`super::build_filter_clause`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub min_salary: Option<FilterValue>,
    pub has_equity: Option<FilterValue>,
    pub title: Option<String>,
}

/// Typed view of the `GET /companies` query string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuery {
    pub min_employees: Option<FilterValue>,
    pub max_employees: Option<FilterValue>,
    pub name: Option<String>,
}

fn push_opt(raw: &mut FilterRequest, key: &str, value: Option<impl Into<FilterValue>>) {
    if let Some(v) = value {
        raw.insert(key, v);
    }
}

impl From<JobQuery> for FilterRequest {
    fn from(q: JobQuery) -> Self {
        let mut raw = FilterRequest::new();
        push_opt(&mut raw, "minSalary", q.min_salary);
        push_opt(&mut raw, "hasEquity", q.has_equity);
        push_opt(&mut raw, "title", q.title);
        raw
    }
}

impl From<CompanyQuery> for FilterRequest {
    fn from(q: CompanyQuery) -> Self {
        let mut raw = FilterRequest::new();
        push_opt(&mut raw, "minEmployees", q.min_employees);
        push_opt(&mut raw, "maxEmployees", q.max_employees);
        push_opt(&mut raw, "name", q.name);
        raw
    }
}
