//! searchnes CLI
//!
//! Search the NES cartridge database by mapper, battery and region, and
//! build that database from a NesCartDB XML export.

mod cli_types;
mod commands;
mod config;
mod error;
mod render;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

/// Install the stderr logger. `CARTDB_LOG` takes env_logger filter syntax
/// and refines the level chosen by `--quiet` / `--verbose`.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("CARTDB_LOG")
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "{}: {}",
                level.as_str().to_ascii_lowercase(),
                record.args()
            ),
        })
        .init();
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn run(cli: Cli) -> Result<(), CliError> {
    cli.check_search_flags()?;

    match cli.command {
        None => commands::search::run_search(cli.database, cli.search),
        Some(Commands::Search(args)) => commands::search::run_search(cli.database, args),
        Some(Commands::Import { xml, force }) => {
            commands::import::run_import(cli.database, &xml, force, cli.quiet)
        }
        Some(Commands::Columns) => {
            commands::columns::run_columns();
            Ok(())
        }
        Some(Commands::Stats) => commands::stats::run_stats(cli.database),
        Some(Commands::Upgrade) => commands::upgrade::run_upgrade(cli.database),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::run_config_show(cli.database),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}
