//! Insert operations for every cartridge database table.
//!
//! Each function inserts a single row and returns the new row id where child
//! rows need to reference it.

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::records::*;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

// ── Game ────────────────────────────────────────────────────────────────────

/// Insert the `game` row for a record. Nested cartridges are not inserted.
pub fn insert_game(conn: &Connection, game: &GameRecord) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO game (name, altname, class, subclass, catalog, publisher, developer, region, players, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            game.name,
            game.altname,
            game.class,
            game.subclass,
            game.catalog,
            game.publisher,
            game.developer,
            game.region,
            game.players,
            game.date,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_device(
    conn: &Connection,
    game_id: i64,
    device: &DeviceRecord,
) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO device (game_id, type, name) VALUES (?1, ?2, ?3)",
        params![game_id, device.device_type, device.name],
    )?;
    Ok(())
}

// ── Cartridge & Board ───────────────────────────────────────────────────────

pub fn insert_cartridge(
    conn: &Connection,
    game_id: i64,
    cartridge: &CartridgeRecord,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO cartridge (game_id, system, revision, crc, sha1, dump, dumper, datedumped)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            game_id,
            cartridge.system,
            cartridge.revision,
            cartridge.crc,
            cartridge.sha1,
            cartridge.dump,
            cartridge.dumper,
            cartridge.datedumped,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_board(
    conn: &Connection,
    cartridge_id: i64,
    board: &BoardRecord,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO board (cartridge_id, type, pcb, mapper) VALUES (?1, ?2, ?3, ?4)",
        params![cartridge_id, board.board_type, board.pcb, board.mapper],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Board Components ────────────────────────────────────────────────────────

/// Insert a PRG or CHR ROM row.
pub fn insert_rom(
    conn: &Connection,
    kind: RomKind,
    board_id: i64,
    rom: &RomRecord,
) -> Result<(), OperationError> {
    // Table name comes from a closed enum, never from input.
    conn.execute(
        &format!(
            "INSERT INTO {} (board_id, name, size, crc, sha1) VALUES (?1, ?2, ?3, ?4, ?5)",
            kind.table()
        ),
        params![board_id, rom.name, rom.size, rom.crc, rom.sha1],
    )?;
    Ok(())
}

pub fn insert_vram(conn: &Connection, board_id: i64, ram: &RamRecord) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO vram (board_id, size) VALUES (?1, ?2)",
        params![board_id, ram.size],
    )?;
    Ok(())
}

/// Insert a WRAM row. Battery is stored as 1 when present and NULL otherwise,
/// which is what the "no battery" search filter tests for.
pub fn insert_wram(conn: &Connection, board_id: i64, ram: &RamRecord) -> Result<(), OperationError> {
    let battery: Option<i64> = ram.battery.then_some(1);
    conn.execute(
        "INSERT INTO wram (board_id, size, battery) VALUES (?1, ?2, ?3)",
        params![board_id, ram.size, battery],
    )?;
    Ok(())
}

pub fn insert_chip(conn: &Connection, board_id: i64, chip: &ChipRecord) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO chip (board_id, type) VALUES (?1, ?2)",
        params![board_id, chip.chip_type],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_chip_pin(conn: &Connection, chip_id: i64, pin: &PinRecord) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO chip_pin (chip_id, number, function) VALUES (?1, ?2, ?3)",
        params![chip_id, pin.number, pin.function],
    )?;
    Ok(())
}

pub fn insert_cic(conn: &Connection, board_id: i64, cic: &CicRecord) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO cic (board_id, type) VALUES (?1, ?2)",
        params![board_id, cic.cic_type],
    )?;
    Ok(())
}

pub fn insert_pad(conn: &Connection, board_id: i64, pad: &PadRecord) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO pad (board_id, h, v) VALUES (?1, ?2, ?3)",
        params![board_id, pad.h, pad.v],
    )?;
    Ok(())
}
