use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::{DATABASE_ENV, Settings, config_path};

/// Show the effective settings and their sources.
pub(crate) fn run_config_show(database: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::resolve(database, None)?;

    log::info!(
        "{}",
        "searchnes Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match config_path() {
        Some(p) if p.exists() => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        ),
        Some(p) => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  Config file: {}",
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }
    crate::log_blank();

    let database_source = format!("({})", settings.database_source);
    log::info!(
        "  database: {} {}",
        settings.database.display(),
        database_source.if_supports_color(Stdout, |t| t.dimmed()),
    );
    if !settings.database.exists() {
        log::warn!("  {} does not exist yet", settings.database.display());
    }
    let engine_source = format!("({})", settings.engine_source);
    log::info!(
        "  engine:   {} {}",
        settings.engine,
        engine_source.if_supports_color(Stdout, |t| t.dimmed()),
    );
    crate::log_blank();
    log::info!("  Set ${} to override the database path.", DATABASE_ENV);

    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}
