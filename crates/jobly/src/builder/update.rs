use crate::error::{JoblyError, JoblyResult};
use crate::value::BoundValue;
use tokio_postgres::types::ToSql;

/// Fields of a partial update, in the order the caller supplied them.
pub type UpdateRequest = serde_json::Map<String, serde_json::Value>;

/// A rendered `SET` fragment and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    /// `"col_a"=$1, "col_b"=$2`, without the `SET` keyword.
    pub clause: String,
    /// Bound values, in placeholder order.
    pub values: Vec<BoundValue>,
}

impl SetClause {
    /// Index of the first placeholder after the SET values, used for the
    /// `WHERE` key of the UPDATE.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Get parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// Build the `SET` fragment of a partial UPDATE.
///
/// Each field becomes `"<column>"=$i` where the column is looked up in
/// `aliases` (logical name -> physical column) and falls back to the field
/// name itself. Column names are quoted but not escaped, so only
/// pre-validated field names may reach this function.
///
/// # Errors
///
/// Returns [`JoblyError::EmptyInput`] when `data` has no fields; an empty
/// `SET` is not valid SQL.
///
/// # Example
///
/// ```rust
/// use jobly::build_set_clause;
///
/// let data = serde_json::json!({"name": "John", "age": 32});
/// let set = build_set_clause(data.as_object().unwrap(), &[]).unwrap();
/// assert_eq!(set.clause, r#""name"=$1, "age"=$2"#);
/// assert_eq!(set.next_placeholder(), 3);
/// ```
pub fn build_set_clause(data: &UpdateRequest, aliases: &[(&str, &str)]) -> JoblyResult<SetClause> {
    if data.is_empty() {
        return Err(JoblyError::EmptyInput);
    }

    let mut set_parts = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (field, value)) in data.iter().enumerate() {
        let column = aliases
            .iter()
            .find(|(logical, _)| *logical == field.as_str())
            .map_or(field.as_str(), |(_, column)| *column);
        set_parts.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(BoundValue::from(value));
    }

    Ok(SetClause {
        clause: set_parts.join(", "),
        values,
    })
}
