//! SQL fragment builders.
//!
//! Both builders produce a fragment plus the values bound to it, with
//! placeholders managed automatically (`$1, $2, ...`). The value at position
//! `i` of `values` is always the one bound to `$(i + 1)`.

pub mod update;
pub mod where_builder;

pub use update::{SetClause, UpdateRequest, build_set_clause};
pub use where_builder::{FilterClause, WhereBuilder};
