//! Progress callbacks for loading a NesCartDB document.

/// Receives updates while a NesCartDB export is read and written.
///
/// An import has two phases. The caller announces parsing itself (the parser
/// is a plain function and reports nothing), then [`import_cartdb`] announces
/// the write phase with the number of `<game>` entries and reports each game
/// once its cartridges, boards, chips and pins are inserted.
///
/// [`import_cartdb`]: crate::import_cartdb
pub trait ImportProgress {
    /// A game and every row below it has been inserted. `current` is 1-based.
    fn on_game(&self, current: usize, total: usize, name: &str);

    /// A phase has started: "Parsing NesCartDB.xml", "Writing 2754 games".
    fn on_phase(&self, message: &str);

    /// The transaction has committed; `message` summarizes the row counts.
    fn on_complete(&self, message: &str);
}

/// Ignores every update.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_game(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Writes updates to the `log` facade at info level.
///
/// A full NesCartDB export holds a few thousand games, so only every
/// [`LogProgress::EVERY`]th game and the last one are logged.
pub struct LogProgress;

impl LogProgress {
    pub const EVERY: usize = 250;
}

impl ImportProgress for LogProgress {
    fn on_game(&self, current: usize, total: usize, name: &str) {
        if current.is_multiple_of(Self::EVERY) || current == total {
            log::info!("  [{current}/{total}] {name}");
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{message}");
    }

    fn on_complete(&self, message: &str) {
        log::info!("{message}");
    }
}
