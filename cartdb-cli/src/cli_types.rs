//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::CliError;
use crate::config::Engine;
use crate::render::OutputFormat;

#[derive(Parser)]
#[command(name = "searchnes")]
#[command(about = "Search the NES cartridge database", long_about = None)]
#[command(arg_required_else_help = true)]
pub(crate) struct Cli {
    /// Cartridge database file (overrides CARTDB_DATABASE and the config file)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Only show warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Print the assembled query and debug-level messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Top-level search flags only apply when no subcommand is given.
    pub(crate) fn check_search_flags(&self) -> Result<(), CliError> {
        if self.command.is_some() && self.search.is_set() {
            return Err(CliError::usage(
                "search flags cannot be combined with a subcommand",
            ));
        }
        Ok(())
    }
}

/// Filters and output options for a cartridge search.
#[derive(Args, Clone, Debug)]
pub(crate) struct SearchArgs {
    /// Mapper number to match (negative matches any mapper)
    #[arg(short, long, allow_negative_numbers = true)]
    pub mapper: Option<String>,

    /// Battery-backed WRAM: true matches boards with a battery, false boards without
    #[arg(short, long)]
    pub battery: Option<String>,

    /// Region name (e.g. usa, japan), or "all"
    #[arg(short, long, default_value = "all")]
    pub region: String,

    /// Add the chip type column
    #[arg(short = 'c', long)]
    pub showchip: bool,

    /// Columns to sort by, in priority order (see `searchnes columns`)
    #[arg(short, long, value_delimiter = ',')]
    pub order_by: Vec<String>,

    /// Engine that runs the query
    #[arg(long, value_enum)]
    pub engine: Option<Engine>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the assembled query without running it
    #[arg(long)]
    pub show_sql: bool,
}

impl SearchArgs {
    /// True when any flag differs from its default.
    pub(crate) fn is_set(&self) -> bool {
        self.mapper.is_some()
            || self.battery.is_some()
            || self.region != "all"
            || self.showchip
            || !self.order_by.is_empty()
            || self.engine.is_some()
            || self.format != OutputFormat::Table
            || self.show_sql
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Search cartridges (the default when no subcommand is given)
    Search(SearchArgs),

    /// Build the database from a NesCartDB XML export
    Import {
        /// Path to the NesCartDB XML file
        xml: PathBuf,

        /// Replace an existing database file
        #[arg(long)]
        force: bool,
    },

    /// List the column names accepted by --order-by
    Columns,

    /// Show database row counts
    Stats,

    /// Migrate a database written by an older importer to the current schema
    Upgrade,

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where each came from
    Show,

    /// Print the config file path
    Path,
}
