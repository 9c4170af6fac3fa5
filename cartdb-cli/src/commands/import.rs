use std::path::{Path, PathBuf};

use cartdb_import::{ImportProgress, import_cartdb, parse_cartdb_file};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::Settings;

/// Spinner that shows the game currently being written.
struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        Self { pb }
    }
}

impl ImportProgress for SpinnerProgress {
    fn on_game(&self, current: usize, total: usize, name: &str) {
        self.pb.set_message(format!("[{current}/{total}] {name}"));
        self.pb.tick();
    }

    fn on_phase(&self, message: &str) {
        self.pb.set_message(message.to_string());
        self.pb.tick();
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        log::info!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            message
        );
    }
}

/// Build the cartridge database from a NesCartDB XML export.
pub(crate) fn run_import(
    database: Option<PathBuf>,
    xml: &Path,
    force: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = Settings::resolve(database, None)?;
    let db_path = settings.database;

    if db_path.exists() && !force {
        return Err(CliError::import(format!(
            "{} already exists (use --force to replace it)",
            db_path.display()
        )));
    }

    log::info!(
        "{}",
        format!("Importing {} into {}", xml.display(), db_path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = SpinnerProgress::new(quiet);
    progress.on_phase(&format!("Parsing {}", xml.display()));
    let cartdb = parse_cartdb_file(xml).map_err(|e| {
        progress.pb.finish_and_clear();
        CliError::import(format!("{}: {}", xml.display(), e))
    })?;

    if db_path.exists() {
        log::warn!("Replacing existing database {}", db_path.display());
        std::fs::remove_file(&db_path)?;
    }

    let conn = cartdb_db::open_database(&db_path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", db_path.display(), e)))?;

    let stats = import_cartdb(&conn, &cartdb, Some(&progress)).map_err(|e| {
        progress.pb.finish_and_clear();
        CliError::import(e.to_string())
    })?;

    crate::log_blank();
    log::info!("  Games:       {:>8}", stats.games);
    log::info!("  Cartridges:  {:>8}", stats.cartridges);
    log::info!("  Boards:      {:>8}", stats.boards);
    log::info!("  Chips:       {:>8}", stats.chips);
    log::info!("  Battery:     {:>8}", stats.battery_boards);

    Ok(())
}
