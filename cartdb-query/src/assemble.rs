//! Composition of filters, projection, and ordering into one SQL query.

use std::fmt;

use thiserror::Error;

use crate::filter::{FilterSet, SqlValue, build_predicates};
use crate::projection::{OrderSpec, resolve_ordering, resolve_projection};
use crate::schema::{self, ColumnError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Cannot build query: {0}")]
    Column(#[from] ColumnError),
}

impl AssemblyError {
    /// The schema lookup that failed.
    pub fn column_error(&self) -> &ColumnError {
        match self {
            Self::Column(e) => e,
        }
    }
}

/// Everything a search needs: filters, whether to show the chip column, and
/// the requested sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub filters: FilterSet,
    pub show_chip: bool,
    pub order: OrderSpec,
}

impl QueryRequest {
    pub fn new(filters: FilterSet) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn show_chip(mut self, show_chip: bool) -> Self {
        self.show_chip = show_chip;
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    pub fn assemble(&self) -> Result<AssembledQuery, AssemblyError> {
        assemble(&self.filters, self.show_chip, &self.order)
    }
}

/// A complete query, ready to hand to an executor.
///
/// Text arguments are referenced positionally (`?1`, `?2`, ...) in the order
/// they appear in [`args`](Self::args).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledQuery {
    sql: String,
    args: Vec<SqlValue>,
    columns: Vec<&'static str>,
}

impl AssembledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Output column names, in SELECT order.
    pub fn column_names(&self) -> &[&'static str] {
        &self.columns
    }
}

impl fmt::Display for AssembledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Build the search query.
///
/// The output is a pure function of the arguments. Clauses are emitted one
/// per line: SELECT, FROM, the joins in join-graph order, WHERE (only when at
/// least one filter applies), then ORDER BY.
pub fn assemble(
    filters: &FilterSet,
    show_chip: bool,
    order: &OrderSpec,
) -> Result<AssembledQuery, AssemblyError> {
    let projection = resolve_projection(show_chip)?;
    let ordering = resolve_ordering(order)?;
    let predicates = build_predicates(filters);

    let mut lines = Vec::with_capacity(schema::join_graph().len() + 4);

    let select: Vec<String> = projection.iter().map(|c| c.select_item()).collect();
    lines.push(format!("SELECT {}", select.join(", ")));
    lines.push(format!("FROM {}", schema::root_table().to_sql()));
    lines.extend(schema::join_graph().iter().map(|edge| edge.to_sql()));

    let mut args = Vec::new();
    if !predicates.is_empty() {
        let conditions: Vec<String> = predicates.iter().map(|p| p.to_sql(&mut args)).collect();
        lines.push(format!("WHERE {}", conditions.join(" AND ")));
    }

    let keys: Vec<String> = ordering
        .iter()
        .map(|c| format!("{} ASC", c.qualified()))
        .collect();
    lines.push(format!("ORDER BY {}", keys.join(", ")));

    let query = AssembledQuery {
        sql: lines.join("\n"),
        args,
        columns: projection.iter().map(|c| c.output_name()).collect(),
    };
    log::trace!("assembled query:\n{}", query.sql);
    Ok(query)
}
