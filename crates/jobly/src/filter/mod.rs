//! Whitelisted, parameterized filters for list endpoints.
//!
//! Each entity declares a static [`FilterSpec`]: the filter keys it
//! recognizes, in a fixed order, and how each one renders. Turning a raw
//! query string into a `WHERE` clause is then a table walk:
//!
//! ```rust
//! use jobly::filter::{FilterRequest, JOB_FILTERS, build_filter_clause};
//!
//! let mut raw = FilterRequest::new();
//! raw.insert("title", "Analyst");
//! raw.insert("minSalary", 50000);
//! raw.insert("color", "blue"); // unknown keys are dropped
//!
//! let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
//! assert_eq!(filter.clause, "WHERE salary >= $1 AND LOWER(title) ILIKE $2");
//! assert_eq!(filter.values.len(), 2);
//! ```

mod query;

pub use query::{CompanyQuery, JobQuery};

use crate::builder::{FilterClause, WhereBuilder};
use crate::value::{BoundValue, FilterValue};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw filters keyed by their query-string name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FilterRequest(BTreeMap<String, FilterValue>);

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Filter names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Build from decoded query-string pairs; every value stays text.
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), FilterValue::Text(v.into())))
            .collect()
    }
}

impl FromIterator<(String, FilterValue)> for FilterRequest {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a recognized filter renders into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `<column> <op> $N`, value bound as received.
    Compare {
        column: &'static str,
        op: &'static str,
    },
    /// `LOWER(<column>) ILIKE $N`, value bound as `%<lower-cased>%`.
    ContainsCi { column: &'static str },
    /// `<column> IS NOT NULL` when the value is `true`, nothing otherwise.
    /// Never binds a value.
    NotNullFlag { column: &'static str },
}

/// One recognized filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn compare(key: &'static str, column: &'static str, op: &'static str) -> Self {
        Self {
            key,
            kind: FilterKind::Compare { column, op },
        }
    }

    pub const fn contains_ci(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            kind: FilterKind::ContainsCi { column },
        }
    }

    pub const fn not_null_flag(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            kind: FilterKind::NotNullFlag { column },
        }
    }

    fn apply(&self, value: &FilterValue, wb: &mut WhereBuilder) {
        match self.kind {
            FilterKind::Compare { column, op } => {
                wb.and_cmp(column, op, BoundValue::from(value.clone()));
            }
            FilterKind::ContainsCi { column } => wb.and_contains_ci(column, &value.to_text()),
            FilterKind::NotNullFlag { column } => {
                if value.as_flag() {
                    wb.and_is_not_null(column);
                }
            }
        }
    }
}

/// The filters an entity accepts, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Table the filters apply to; tags log events.
    pub entity: &'static str,
    pub fields: &'static [FilterField],
}

impl FilterSpec {
    pub const fn new(entity: &'static str, fields: &'static [FilterField]) -> Self {
        Self { entity, fields }
    }

    /// Whether `key` is one of this entity's filters.
    pub fn recognizes(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }

    /// Recognized keys, in rendering order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }
}

/// Filters accepted by `GET /jobs`.
pub const JOB_FILTERS: FilterSpec = FilterSpec::new(
    "jobs",
    &[
        FilterField::compare("minSalary", "salary", ">="),
        FilterField::not_null_flag("hasEquity", "equity"),
        FilterField::contains_ci("title", "title"),
    ],
);

/// Filters accepted by `GET /companies`.
pub const COMPANY_FILTERS: FilterSpec = FilterSpec::new(
    "companies",
    &[
        FilterField::compare("minEmployees", "num_employees", ">"),
        FilterField::compare("maxEmployees", "num_employees", "<"),
        FilterField::contains_ci("name", "name"),
    ],
);

/// Translate raw filters into a `WHERE` clause with placeholders from `$1`.
///
/// Keys are taken in the order `spec` declares them, not the order they
/// arrived in; keys `spec` does not know are ignored. Returns `None` when no
/// condition is produced, so callers must not emit a `WHERE` at all.
pub fn build_filter_clause(raw: &FilterRequest, spec: &FilterSpec) -> Option<FilterClause> {
    build_filter_clause_from(raw, spec, 0)
}

/// Like [`build_filter_clause`], numbering placeholders after `offset`
/// already-bound parameters.
pub fn build_filter_clause_from(
    raw: &FilterRequest,
    spec: &FilterSpec,
    offset: usize,
) -> Option<FilterClause> {
    let mut wb = WhereBuilder::with_offset(offset);
    for field in spec.fields {
        if let Some(value) = raw.get(field.key) {
            field.apply(value, &mut wb);
        }
    }
    let ignored = raw.keys().filter(|key| !spec.recognizes(key)).count();
    tracing::debug!(
        entity = spec.entity,
        params = wb.param_count() - offset,
        ignored,
        "built filter clause"
    );
    wb.build()
}

#[cfg(test)]
mod tests;
