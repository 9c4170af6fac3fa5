//! Output column selection and sort order.

use crate::schema::{self, CHIP_TYPE, ColumnError, ColumnRef};

/// Caller-requested sort keys, in priority order. Every key sorts ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    columns: Vec<String>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_by(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The SELECT list: the base columns, plus the chip type last when requested.
pub fn resolve_projection(show_chip: bool) -> Result<Vec<ColumnRef>, ColumnError> {
    let mut columns = schema::base_columns().to_vec();
    if show_chip {
        columns.push(schema::optional_column(CHIP_TYPE)?);
    }
    Ok(columns)
}

/// Resolve sort keys against every column in the join graph, not just the
/// projected ones. An empty order sorts by game name.
pub fn resolve_ordering(order: &OrderSpec) -> Result<Vec<ColumnRef>, ColumnError> {
    if order.is_empty() {
        return Ok(vec![schema::game_name()]);
    }
    order
        .columns
        .iter()
        .map(|name| schema::resolve_column(name))
        .collect()
}
