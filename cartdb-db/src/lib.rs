//! SQLite persistence layer for the NES cartridge database.
//!
//! Provides schema creation, the insert operations used by the importer,
//! summary statistics, and the executors that run assembled search queries.

pub mod execute;
pub mod operations;
pub mod queries;
pub mod records;
pub mod schema;

pub use execute::{
    CellValue, ExecutionError, QueryExecutor, QueryResult, Sqlite3ShellExecutor, SqliteExecutor,
};
pub use operations::{
    OperationError, insert_board, insert_cartridge, insert_chip, insert_chip_pin, insert_cic,
    insert_device, insert_game, insert_pad, insert_rom, insert_vram, insert_wram,
};
pub use queries::{DatabaseStats, database_stats};
pub use records::*;
pub use schema::{SchemaError, is_outdated, open_database, open_memory, open_read_only};
