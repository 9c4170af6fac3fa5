//! Write a parsed [`CartDb`] into the cartridge database.

use cartdb_db::{BoardRecord, GameRecord, RomKind, operations};
use rusqlite::Connection;

use crate::error::ImportError;
use crate::parser::CartDb;
use crate::progress::ImportProgress;

/// Row counts written by one import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub games: u64,
    pub devices: u64,
    pub cartridges: u64,
    pub boards: u64,
    pub roms: u64,
    pub rams: u64,
    pub chips: u64,
    pub pins: u64,
    pub battery_boards: u64,
}

/// Import every game of `db` inside a single transaction.
///
/// Nothing is written if any row fails to insert.
pub fn import_cartdb(
    conn: &Connection,
    db: &CartDb,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut stats = ImportStats::default();
    let total = db.games.len();

    if let Some(p) = progress {
        p.on_phase(&format!("Writing {total} games"));
    }

    let tx = conn.unchecked_transaction()?;

    for (i, game) in db.games.iter().enumerate() {
        import_game(&tx, game, &mut stats)?;

        if let Some(p) = progress {
            p.on_game(i + 1, total, &game.name);
        }
    }

    tx.commit()?;

    log::debug!(
        "Imported {} games, {} cartridges, {} boards",
        stats.games,
        stats.cartridges,
        stats.boards
    );
    if let Some(p) = progress {
        p.on_complete(&format!(
            "Imported {} games ({} boards, {} battery-backed)",
            stats.games, stats.boards, stats.battery_boards
        ));
    }

    Ok(stats)
}

fn import_game(
    conn: &Connection,
    game: &GameRecord,
    stats: &mut ImportStats,
) -> Result<(), ImportError> {
    let game_id = operations::insert_game(conn, game)?;
    stats.games += 1;

    for device in &game.peripherals {
        operations::insert_device(conn, game_id, device)?;
        stats.devices += 1;
    }

    for cartridge in &game.cartridges {
        let cartridge_id = operations::insert_cartridge(conn, game_id, cartridge)?;
        stats.cartridges += 1;

        for board in &cartridge.boards {
            import_board(conn, cartridge_id, board, stats)?;
        }
    }

    Ok(())
}

fn import_board(
    conn: &Connection,
    cartridge_id: i64,
    board: &BoardRecord,
    stats: &mut ImportStats,
) -> Result<(), ImportError> {
    let board_id = operations::insert_board(conn, cartridge_id, board)?;
    stats.boards += 1;

    for (kind, roms) in [(RomKind::Prg, &board.prg), (RomKind::Chr, &board.chr)] {
        for rom in roms {
            operations::insert_rom(conn, kind, board_id, rom)?;
            stats.roms += 1;
        }
    }

    for ram in &board.vram {
        operations::insert_vram(conn, board_id, ram)?;
        stats.rams += 1;
    }
    for ram in &board.wram {
        operations::insert_wram(conn, board_id, ram)?;
        stats.rams += 1;
    }
    if board.wram.iter().any(|ram| ram.battery) {
        stats.battery_boards += 1;
    }

    for chip in &board.chips {
        let chip_id = operations::insert_chip(conn, board_id, chip)?;
        stats.chips += 1;
        for pin in &chip.pins {
            operations::insert_chip_pin(conn, chip_id, pin)?;
            stats.pins += 1;
        }
    }

    for cic in &board.cic {
        operations::insert_cic(conn, board_id, cic)?;
    }
    for pad in &board.pads {
        operations::insert_pad(conn, board_id, pad)?;
    }

    Ok(())
}
