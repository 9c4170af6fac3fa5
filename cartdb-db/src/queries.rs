//! Summary queries over the cartridge database.

use rusqlite::Connection;

use crate::operations::OperationError;

/// Row counts for the main tables.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub games: i64,
    pub cartridges: i64,
    pub boards: i64,
    pub distinct_mappers: i64,
    pub chips: i64,
    pub battery_boards: i64,
}

/// Get overall database statistics.
pub fn database_stats(conn: &Connection) -> Result<DatabaseStats, OperationError> {
    let count = |sql: &str| -> Result<i64, rusqlite::Error> { conn.query_row(sql, [], |r| r.get(0)) };

    Ok(DatabaseStats {
        games: count("SELECT COUNT(*) FROM game")?,
        cartridges: count("SELECT COUNT(*) FROM cartridge")?,
        boards: count("SELECT COUNT(*) FROM board")?,
        distinct_mappers: count("SELECT COUNT(DISTINCT mapper) FROM board")?,
        chips: count("SELECT COUNT(*) FROM chip")?,
        battery_boards: count("SELECT COUNT(DISTINCT board_id) FROM wram WHERE battery = 1")?,
    })
}
