//! SQLite schema creation and migration.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
///
/// Version 1 is the legacy `import.py` layout: no `wram.battery` column and
/// no version table.
pub const CURRENT_VERSION: i32 = 2;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a cartridge database at the given path, migrating older
/// layouts to the current version.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        if table_exists(&conn, "game")? {
            log::debug!("Unversioned database at {}, treating as version 1", path.display());
            conn.execute_batch(SCHEMA_SQL)?;
            set_schema_version(&conn, 1)?;
            migrate(&conn, 1)?;
        } else {
            create_schema(&conn)?;
        }
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Open an existing database for searching. Never creates or migrates.
pub fn open_read_only(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// True when the database predates [`CURRENT_VERSION`] and needs
/// [`open_database`] to migrate it before it can be searched.
///
/// An unversioned file counts as outdated only if it has a `game` table,
/// i.e. it was written by `import.py`.
pub fn is_outdated(conn: &Connection) -> Result<bool, SchemaError> {
    match get_schema_version(conn)? {
        0 => table_exists(conn, "game"),
        version => Ok(version < CURRENT_VERSION),
    }
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    let mut version = from_version;
    while version < CURRENT_VERSION {
        if version == 1 {
            conn.execute_batch("ALTER TABLE wram ADD COLUMN battery INTEGER;")?;
        }
        version += 1;
        log::debug!("Migrated cartridge database to schema version {}", version);
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS game (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    altname TEXT,
    class TEXT,
    subclass TEXT,
    catalog TEXT,
    publisher TEXT,
    developer TEXT,
    region TEXT,
    players TEXT,
    date TEXT
);

CREATE TABLE IF NOT EXISTS cartridge (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL REFERENCES game(id),
    system TEXT,
    revision TEXT,
    crc TEXT,
    sha1 TEXT,
    dump TEXT,
    dumper TEXT,
    datedumped TEXT
);
CREATE INDEX IF NOT EXISTS idx_cartridge_game ON cartridge(game_id);

-- Peripherals a game supports (zapper, power pad, ...)
CREATE TABLE IF NOT EXISTS device (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL REFERENCES game(id),
    type TEXT,
    name TEXT
);

-- Mapper is stored as text, as it appears in the source XML
CREATE TABLE IF NOT EXISTS board (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cartridge_id INTEGER NOT NULL REFERENCES cartridge(id),
    type TEXT,
    pcb TEXT,
    mapper TEXT
);
CREATE INDEX IF NOT EXISTS idx_board_cartridge ON board(cartridge_id);
CREATE INDEX IF NOT EXISTS idx_board_mapper ON board(mapper);

CREATE TABLE IF NOT EXISTS prg (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    name TEXT,
    size TEXT,
    crc TEXT,
    sha1 TEXT
);
CREATE INDEX IF NOT EXISTS idx_prg_board ON prg(board_id);

CREATE TABLE IF NOT EXISTS chr (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    name TEXT,
    size TEXT,
    crc TEXT,
    sha1 TEXT
);
CREATE INDEX IF NOT EXISTS idx_chr_board ON chr(board_id);

CREATE TABLE IF NOT EXISTS vram (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    size TEXT
);
CREATE INDEX IF NOT EXISTS idx_vram_board ON vram(board_id);

-- battery is 1 for battery-backed RAM, NULL otherwise
CREATE TABLE IF NOT EXISTS wram (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    size TEXT,
    battery INTEGER
);
CREATE INDEX IF NOT EXISTS idx_wram_board ON wram(board_id);

CREATE TABLE IF NOT EXISTS chip (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    type TEXT
);
CREATE INDEX IF NOT EXISTS idx_chip_board ON chip(board_id);

CREATE TABLE IF NOT EXISTS chip_pin (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chip_id INTEGER NOT NULL REFERENCES chip(id),
    number TEXT,
    function TEXT
);

CREATE TABLE IF NOT EXISTS cic (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    type TEXT
);

CREATE TABLE IF NOT EXISTS pad (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    h TEXT,
    v TEXT
);
"#;
