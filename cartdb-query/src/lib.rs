//! Filter-to-SQL query construction for the NES cartridge database.
//!
//! This crate turns a set of optional search criteria into a single SQL query
//! over the fixed eight-table join graph (`game` → `cartridge` → `board` and
//! the board's memory/chip tables). It performs no I/O: executing the query is
//! the job of `cartdb-db`.
//!
//! ```
//! use cartdb_query::{FilterSet, QueryRequest};
//!
//! let request = QueryRequest::new(FilterSet::new().mapper(4));
//! let query = request.assemble().unwrap();
//! assert!(query.sql().contains("WHERE board.mapper = 4"));
//! assert_eq!(query.column_names().len(), 11);
//! ```

pub mod assemble;
pub mod filter;
pub mod projection;
pub mod schema;

pub use assemble::{AssembledQuery, AssemblyError, QueryRequest, assemble};
pub use filter::{
    FilterError, FilterSet, Predicate, REGION_ALL, SqlValue, build_predicates, normalize_region,
    parse_battery, parse_mapper,
};
pub use projection::{OrderSpec, resolve_ordering, resolve_projection};
pub use schema::{
    CHIP_TYPE, ColumnError, ColumnRef, JoinEdge, JoinKind, Table, all_columns, base_columns,
    join_graph, optional_column, resolve_column, tables,
};
