//! WHERE clause accumulator shared by the entity filters.

use crate::value::BoundValue;
use tokio_postgres::types::ToSql;

/// A rendered `WHERE` clause and the values bound to its placeholders.
///
/// `values[i]` is bound to `$(offset + i + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// `WHERE ...` text, ready to append to a `SELECT`.
    pub clause: String,
    /// Bound values, in placeholder order.
    pub values: Vec<BoundValue>,
    offset: usize,
}

impl FilterClause {
    /// Index of the next free placeholder after this clause.
    pub fn next_placeholder(&self) -> usize {
        self.offset + self.values.len() + 1
    }

    /// Get parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// Accumulates conditions and keeps `$N` aligned with the bound values.
///
/// Conditions without a value never consume a placeholder index, so the
/// values stay contiguous no matter where a value-less condition lands.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    /// WHERE conditions (without leading AND)
    conditions: Vec<String>,
    /// Parameter values
    values: Vec<BoundValue>,
    /// Placeholders already taken before this clause
    offset: usize,
}

impl WhereBuilder {
    /// Create a new WhereBuilder with param numbering starting at 1.
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Create a new WhereBuilder with param numbering starting after `offset`.
    ///
    /// For example, `with_offset(2)` means the first param will be `$3`.
    pub fn with_offset(offset: usize) -> Self {
        Self {
            conditions: Vec::new(),
            values: Vec::new(),
            offset,
        }
    }

    /// Get current parameter count, including the offset.
    pub fn param_count(&self) -> usize {
        self.offset + self.values.len()
    }

    /// Check if any conditions have been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Add a condition rendered from its placeholder index, binding `value`.
    pub fn and_bind(&mut self, render: impl FnOnce(usize) -> String, value: BoundValue) {
        let idx = self.param_count() + 1;
        self.conditions.push(render(idx));
        self.values.push(value);
    }

    /// Add AND `<col> <op> $N`.
    pub fn and_cmp(&mut self, col: &str, op: &str, value: BoundValue) {
        self.and_bind(|idx| format!("{} {} ${}", col, op, idx), value);
    }

    /// Add a case-insensitive substring match on `col`.
    ///
    /// The bound pattern is `%<needle lower-cased>%`.
    pub fn and_contains_ci(&mut self, col: &str, needle: &str) {
        let pattern = format!("%{}%", needle.to_lowercase());
        self.and_bind(
            |idx| format!("LOWER({}) ILIKE ${}", col, idx),
            BoundValue::Text(pattern),
        );
    }

    /// Add AND IS NOT NULL condition.
    pub fn and_is_not_null(&mut self, col: &str) {
        self.conditions.push(format!("{} IS NOT NULL", col));
    }

    /// Finish the clause. `None` when no condition was added.
    pub fn build(self) -> Option<FilterClause> {
        if self.conditions.is_empty() {
            return None;
        }

        Some(FilterClause {
            clause: format!("WHERE {}", self.conditions.join(" AND ")),
            values: self.values,
            offset: self.offset,
        })
    }
}
