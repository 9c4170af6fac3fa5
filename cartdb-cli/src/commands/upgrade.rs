use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::Settings;

/// Bring an existing database up to the current schema in place.
pub(crate) fn run_upgrade(database: Option<PathBuf>) -> Result<(), CliError> {
    let db_path = Settings::resolve(database, None)?.database;

    if !db_path.is_file() {
        return Err(CliError::database(format!(
            "No cartridge database found at {}",
            db_path.display()
        )));
    }

    let before = cartdb_db::open_read_only(&db_path)
        .and_then(|conn| cartdb_db::schema::get_schema_version(&conn))
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", db_path.display(), e)))?;

    if before == cartdb_db::schema::CURRENT_VERSION {
        log::info!("{} is already up to date", db_path.display());
        return Ok(());
    }

    let conn = cartdb_db::open_database(&db_path)
        .map_err(|e| CliError::database(format!("Failed to upgrade {}: {}", db_path.display(), e)))?;
    let after = cartdb_db::schema::get_schema_version(&conn)
        .map_err(|e| CliError::database(e.to_string()))?;

    log::info!(
        "  {} Upgraded {} from schema version {} to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        db_path.display(),
        before,
        after,
    );

    Ok(())
}
