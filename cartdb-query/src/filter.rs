//! Search filters and the predicates they turn into.

use thiserror::Error;

use crate::schema::{BOARD, ColumnRef, GAME, Table, WRAM};

/// Region value that disables region filtering (compared after normalization).
pub const REGION_ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid value for --{flag}: '{value}' ({reason})")]
    InvalidFilterValue {
        flag: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl FilterError {
    fn invalid(flag: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidFilterValue {
            flag,
            value: value.to_string(),
            reason,
        }
    }
}

/// Caller-supplied search criteria. Every field is optional and narrows the
/// result set independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// iNES mapper number. Negative values mean "no mapper filter".
    pub mapper: Option<i64>,
    /// Battery-backed WRAM: `None` = don't care.
    pub battery: Option<bool>,
    /// Raw region name, normalized when predicates are built.
    pub region: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapper(mut self, mapper: i64) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn battery(mut self, battery: bool) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Build a filter set from raw command-line text.
    pub fn from_raw(
        mapper: Option<&str>,
        battery: Option<&str>,
        region: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            mapper: mapper.map(parse_mapper).transpose()?,
            battery: battery.map(parse_battery).transpose()?,
            region: region.map(str::to_string),
        })
    }

    /// True when no field would produce a predicate.
    pub fn is_unfiltered(&self) -> bool {
        build_predicates(self).is_empty()
    }
}

/// Parse a mapper number. Negative numbers are accepted and mean "unset".
pub fn parse_mapper(raw: &str) -> Result<i64, FilterError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FilterError::invalid("mapper", raw, "expected an integer"))
}

/// Parse a boolean flag value. Accepts the `strconv.ParseBool` spellings.
pub fn parse_battery(raw: &str) -> Result<bool, FilterError> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(FilterError::invalid(
            "battery",
            raw,
            "expected true/false, t/f or 1/0",
        )),
    }
}

/// Normalize a region name: lower-case, then upper-case the first letter of
/// each word. "Usa" is the one spelling the region vocabulary writes
/// differently, as "USA".
///
/// ```
/// use cartdb_query::normalize_region;
///
/// assert_eq!(normalize_region("usa"), "USA");
/// assert_eq!(normalize_region("NORTH america"), "North America");
/// assert_eq!(normalize_region("aLL"), "All");
/// ```
pub fn normalize_region(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut word_start = true;
    for c in raw.trim().to_lowercase().chars() {
        if word_start {
            normalized.extend(c.to_uppercase());
        } else {
            normalized.push(c);
        }
        word_start = !(c.is_alphanumeric() || c == '_');
    }

    if normalized == "Usa" {
        return "USA".to_string();
    }
    normalized
}

// ── Predicates ──────────────────────────────────────────────────────────────

/// A literal a predicate compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Embedded directly into the query text.
    Integer(i64),
    /// Always bound as a query parameter.
    Text(String),
}

/// A single WHERE condition. Predicates only ever combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals { column: ColumnRef, value: SqlValue },
    IsNull { column: ColumnRef },
}

impl Predicate {
    pub fn column(&self) -> ColumnRef {
        match self {
            Self::Equals { column, .. } | Self::IsNull { column } => *column,
        }
    }

    /// Render this predicate, pushing any bound text onto `args` and
    /// referencing it by its 1-based position.
    pub fn to_sql(&self, args: &mut Vec<SqlValue>) -> String {
        match self {
            Self::Equals {
                column,
                value: SqlValue::Integer(n),
            } => format!("{} = {}", column.qualified(), n),
            Self::Equals { column, value } => {
                args.push(value.clone());
                format!("{} = ?{}", column.qualified(), args.len())
            }
            Self::IsNull { column } => format!("{} IS NULL", column.qualified()),
        }
    }
}

/// Turn a filter set into predicates, in a fixed order: mapper, battery, region.
///
/// A region that normalizes to `All`, or to nothing at all (empty or
/// whitespace-only input), adds no predicate.
pub fn build_predicates(filters: &FilterSet) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if let Some(mapper) = filters.mapper.filter(|m| *m >= 0) {
        predicates.push(Predicate::Equals {
            column: column(&BOARD, "mapper"),
            value: SqlValue::Integer(mapper),
        });
    }

    // A board without a wram row has a NULL battery after the outer join, so
    // "no battery" is IS NULL rather than = 0.
    match filters.battery {
        Some(true) => predicates.push(Predicate::Equals {
            column: column(&WRAM, "battery"),
            value: SqlValue::Integer(1),
        }),
        Some(false) => predicates.push(Predicate::IsNull {
            column: column(&WRAM, "battery"),
        }),
        None => {}
    }

    if let Some(raw) = &filters.region {
        let region = normalize_region(raw);
        if !region.is_empty() && region != REGION_ALL {
            predicates.push(Predicate::Equals {
                column: column(&GAME, "region"),
                value: SqlValue::Text(region),
            });
        }
    }

    predicates
}

fn column(table: &'static Table, name: &'static str) -> ColumnRef {
    ColumnRef::known(table, name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_each_word() {
        assert_eq!(normalize_region("japan"), "Japan");
        assert_eq!(normalize_region("EUROPE"), "Europe");
        assert_eq!(normalize_region("  usa "), "USA");
        assert_eq!(normalize_region("usa, europe"), "Usa, Europe");
        assert_eq!(normalize_region("hong-kong"), "Hong-Kong");
    }

    #[test]
    fn battery_spellings() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_battery(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_battery(raw), Ok(false), "{raw}");
        }
        assert!(parse_battery("yes").is_err());
        assert!(parse_battery("").is_err());
    }

    #[test]
    fn integer_predicates_embed_and_text_binds() {
        let mut args = Vec::new();
        let sql: Vec<String> = build_predicates(
            &FilterSet::new().mapper(1).battery(true).region("japan"),
        )
        .iter()
        .map(|p| p.to_sql(&mut args))
        .collect();

        assert_eq!(
            sql,
            vec!["board.mapper = 1", "wram.battery = 1", "game.region = ?1"]
        );
        assert_eq!(args, vec![SqlValue::Text("Japan".to_string())]);
    }

    #[test]
    fn blank_region_adds_no_predicate() {
        for raw in ["", "   ", "all", " ALL "] {
            let filters = FilterSet::new().region(raw);
            assert!(build_predicates(&filters).is_empty(), "{raw:?}");
            assert!(filters.is_unfiltered());
        }
    }
}
