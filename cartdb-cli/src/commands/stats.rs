use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::Settings;

pub(crate) fn run_stats(database: Option<PathBuf>) -> Result<(), CliError> {
    let db_path = Settings::resolve(database, None)?.database;

    if !db_path.exists() {
        log::warn!("No cartridge database found at {}", db_path.display());
        log::info!("Run 'searchnes import <XML>' to create one.");
        return Ok(());
    }

    let conn = cartdb_db::open_read_only(&db_path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", db_path.display(), e)))?;

    let outdated = cartdb_db::is_outdated(&conn)
        .map_err(|e| CliError::database(format!("Failed to read schema version: {}", e)))?;
    if outdated {
        return Err(CliError::database(format!(
            "{} uses an older schema; run 'searchnes upgrade' first",
            db_path.display()
        )));
    }

    let stats = cartdb_db::database_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query stats: {}", e)))?;

    log::info!(
        "{}",
        "Cartridge Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Games:           {:>8}", stats.games);
    log::info!("  Cartridges:      {:>8}", stats.cartridges);
    log::info!("  Boards:          {:>8}", stats.boards);
    log::info!("  Mappers:         {:>8}", stats.distinct_mappers);
    log::info!("  Chips:           {:>8}", stats.chips);
    log::info!("  Battery boards:  {:>8}", stats.battery_boards);

    Ok(())
}
