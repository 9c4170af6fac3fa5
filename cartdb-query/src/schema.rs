//! Static model of the cartridge database: tables, join graph, and the
//! canonical output projection.
//!
//! Everything here is read-only data. Identifiers emitted into SQL only ever
//! come from these tables; user-supplied names are looked up against them and
//! never copied into a query.

use std::fmt;

use thiserror::Error;

/// Errors raised when a column name does not resolve against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),
    #[error("Optional column not found: '{0}'")]
    NotFound(String),
}

/// A table in the join graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: &'static str,
    /// Alias used in the FROM/JOIN clause, if any.
    pub alias: Option<&'static str>,
    /// Columns of this table that queries may reference.
    pub columns: &'static [&'static str],
}

impl Table {
    /// The name columns of this table are qualified with in emitted SQL.
    pub fn qualifier(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// Render the table as it appears after FROM or JOIN.
    pub fn to_sql(&self) -> String {
        match self.alias {
            Some(alias) => format!("{} {}", self.name, alias),
            None => self.name.to_string(),
        }
    }

    fn matches_qualifier(&self, qualifier: &str) -> bool {
        self.name == qualifier || self.alias == Some(qualifier)
    }
}

pub static GAME: Table = Table {
    name: "game",
    alias: None,
    columns: &["id", "name", "region"],
};

pub static CARTRIDGE: Table = Table {
    name: "cartridge",
    alias: None,
    columns: &["id", "game_id"],
};

pub static BOARD: Table = Table {
    name: "board",
    alias: None,
    columns: &["id", "cartridge_id", "mapper", "type"],
};

pub static PRG: Table = Table {
    name: "prg",
    alias: None,
    columns: &["board_id", "name", "size"],
};

pub static CHR: Table = Table {
    name: "chr",
    alias: None,
    columns: &["board_id", "name", "size"],
};

pub static VRAM: Table = Table {
    name: "vram",
    alias: None,
    columns: &["board_id", "size"],
};

pub static WRAM: Table = Table {
    name: "wram",
    alias: None,
    columns: &["board_id", "size", "battery"],
};

pub static CHIP: Table = Table {
    name: "chip",
    alias: None,
    columns: &["board_id", "type"],
};

static TABLES: [&Table; 8] = [&GAME, &CARTRIDGE, &BOARD, &PRG, &CHR, &VRAM, &WRAM, &CHIP];

/// All tables in the join graph, root first, in join order.
pub fn tables() -> &'static [&'static Table] {
    &TABLES
}

/// The table the join graph is rooted at.
pub fn root_table() -> &'static Table {
    &GAME
}

// ── Column References ───────────────────────────────────────────────────────

/// A column of a join-graph table, optionally carrying an output alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    table: &'static Table,
    column: &'static str,
    alias: Option<&'static str>,
}

impl ColumnRef {
    /// Build a reference to `table.column`, checking that the table belongs to
    /// the join graph and has that column.
    pub fn new(
        table: &'static Table,
        column: &str,
        alias: Option<&'static str>,
    ) -> Result<Self, ColumnError> {
        let qualified = format!("{}.{}", table.name, column);
        if !TABLES.iter().any(|t| *t == table) {
            return Err(ColumnError::UnknownColumn(qualified));
        }
        let column = table
            .columns
            .iter()
            .copied()
            .find(|c| *c == column)
            .ok_or(ColumnError::UnknownColumn(qualified))?;
        Ok(Self {
            table,
            column,
            alias,
        })
    }

    /// Static schema entries only; membership is covered by the schema tests.
    pub(crate) const fn known(
        table: &'static Table,
        column: &'static str,
        alias: Option<&'static str>,
    ) -> Self {
        Self {
            table,
            column,
            alias,
        }
    }

    pub fn table(&self) -> &'static Table {
        self.table
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    /// The name this column carries in a result set.
    pub fn output_name(&self) -> &'static str {
        self.alias.unwrap_or(self.column)
    }

    /// `qualifier.column`, as used in WHERE and ORDER BY.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table.qualifier(), self.column)
    }

    /// `qualifier.column AS alias`, as used in the SELECT list.
    pub fn select_item(&self) -> String {
        match self.alias {
            Some(alias) => format!("{} AS {}", self.qualified(), alias),
            None => self.qualified(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table.qualifier(), self.column)
    }
}

// ── Join Graph ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::LeftOuter => "LEFT JOIN",
        }
    }
}

/// One edge of the join graph: `right` is joined onto the already-joined
/// `left` with `right.right_column = left.left_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinEdge {
    pub left: &'static Table,
    pub right: &'static Table,
    pub kind: JoinKind,
    pub left_column: &'static str,
    pub right_column: &'static str,
}

impl JoinEdge {
    /// Render the full JOIN clause for this edge.
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {}.{} = {}.{}",
            self.kind.keyword(),
            self.right.to_sql(),
            self.right.qualifier(),
            self.right_column,
            self.left.qualifier(),
            self.left_column,
        )
    }
}

const fn edge(
    left: &'static Table,
    right: &'static Table,
    kind: JoinKind,
    left_column: &'static str,
    right_column: &'static str,
) -> JoinEdge {
    JoinEdge {
        left,
        right,
        kind,
        left_column,
        right_column,
    }
}

// A board need not populate every memory region, hence the outer joins.
static JOIN_GRAPH: [JoinEdge; 7] = [
    edge(&GAME, &CARTRIDGE, JoinKind::Inner, "id", "game_id"),
    edge(&CARTRIDGE, &BOARD, JoinKind::Inner, "id", "cartridge_id"),
    edge(&BOARD, &PRG, JoinKind::LeftOuter, "id", "board_id"),
    edge(&BOARD, &CHR, JoinKind::LeftOuter, "id", "board_id"),
    edge(&BOARD, &VRAM, JoinKind::LeftOuter, "id", "board_id"),
    edge(&BOARD, &WRAM, JoinKind::LeftOuter, "id", "board_id"),
    edge(&BOARD, &CHIP, JoinKind::LeftOuter, "id", "board_id"),
];

/// The seven join edges, in the order they are emitted.
pub fn join_graph() -> &'static [JoinEdge] {
    &JOIN_GRAPH
}

// ── Projection ──────────────────────────────────────────────────────────────

/// Output alias of the optional chip column.
pub const CHIP_TYPE: &str = "chip_type";

static BASE_COLUMNS: [ColumnRef; 11] = [
    ColumnRef::known(&GAME, "name", Some("game_name")),
    ColumnRef::known(&GAME, "region", Some("region")),
    ColumnRef::known(&BOARD, "mapper", Some("mapper")),
    ColumnRef::known(&BOARD, "type", Some("board_type")),
    ColumnRef::known(&PRG, "name", Some("prg_name")),
    ColumnRef::known(&PRG, "size", Some("prg_size")),
    ColumnRef::known(&CHR, "name", Some("chr_name")),
    ColumnRef::known(&CHR, "size", Some("chr_size")),
    ColumnRef::known(&VRAM, "size", Some("vram_size")),
    ColumnRef::known(&WRAM, "size", Some("wram_size")),
    ColumnRef::known(&WRAM, "battery", Some("battery")),
];

static OPTIONAL_COLUMNS: [ColumnRef; 1] = [ColumnRef::known(&CHIP, "type", Some(CHIP_TYPE))];

/// The eleven columns every query selects, in output order.
pub fn base_columns() -> &'static [ColumnRef] {
    &BASE_COLUMNS
}

/// Look up an optional output column by its alias.
pub fn optional_column(name: &str) -> Result<ColumnRef, ColumnError> {
    OPTIONAL_COLUMNS
        .iter()
        .find(|c| c.alias == Some(name))
        .copied()
        .ok_or_else(|| ColumnError::NotFound(name.to_string()))
}

/// The key the default ordering sorts on.
pub fn game_name() -> ColumnRef {
    BASE_COLUMNS[0]
}

/// Every column of every join-graph table, in table order, without aliases.
pub fn all_columns() -> Vec<ColumnRef> {
    TABLES
        .iter()
        .copied()
        .flat_map(|table| {
            table
                .columns
                .iter()
                .map(move |&column| ColumnRef::known(table, column, None))
        })
        .collect()
}

/// Resolve a user-supplied column name.
///
/// Accepts an output alias (`prg_size`, `chip_type`) or a qualified name
/// (`prg.size`, `board.mapper`). Matching is ASCII case-insensitive.
pub fn resolve_column(name: &str) -> Result<ColumnRef, ColumnError> {
    let wanted = name.trim().to_ascii_lowercase();
    let unknown = || ColumnError::UnknownColumn(name.to_string());

    if let Some((qualifier, column)) = wanted.split_once('.') {
        let table = TABLES
            .iter()
            .copied()
            .find(|t| t.matches_qualifier(qualifier))
            .ok_or_else(unknown)?;
        return ColumnRef::new(table, column, None).map_err(|_| unknown());
    }

    BASE_COLUMNS
        .iter()
        .chain(OPTIONAL_COLUMNS.iter())
        .find(|c| c.alias == Some(wanted.as_str()))
        .copied()
        .ok_or_else(unknown)
}
