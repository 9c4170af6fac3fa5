//! Load NesCartDB XML exports into the cartridge database.
//!
//! [`parse_cartdb`] turns the XML document into typed records and
//! [`import_cartdb`] writes them, one transaction per import.

pub mod error;
pub mod import;
pub mod parser;
pub mod progress;

pub use error::ImportError;
pub use import::{ImportStats, import_cartdb};
pub use parser::{CartDb, parse_cartdb, parse_cartdb_file};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
