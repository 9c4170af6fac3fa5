use std::io::Write;
use std::path::PathBuf;

use cartdb_db::{QueryExecutor, Sqlite3ShellExecutor, SqliteExecutor};
use cartdb_query::{AssembledQuery, FilterSet, OrderSpec, QueryRequest, SqlValue};

use crate::CliError;
use crate::cli_types::SearchArgs;
use crate::config::{Engine, Settings};
use crate::render;

/// Turn the command-line flags into an assembled query.
pub(crate) fn build_query(args: &SearchArgs) -> Result<AssembledQuery, CliError> {
    let filters = FilterSet::from_raw(
        args.mapper.as_deref(),
        args.battery.as_deref(),
        Some(args.region.as_str()),
    )?;
    let order: OrderSpec = args.order_by.iter().collect();

    let query = QueryRequest::new(filters)
        .show_chip(args.showchip)
        .order(order)
        .assemble()?;
    Ok(query)
}

/// The query text for `--show-sql`, followed by a `-- args:` comment line
/// holding the bound values as SQL literals in `?N` order.
pub(crate) fn sql_listing(query: &AssembledQuery) -> String {
    let mut listing = format!("{query};\n");
    if !query.args().is_empty() {
        let literals: Vec<String> = query
            .args()
            .iter()
            .map(|value| match value {
                SqlValue::Integer(n) => n.to_string(),
                SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            })
            .collect();
        listing.push_str(&format!("-- args: [{}]\n", literals.join(", ")));
    }
    listing
}

/// Run a cartridge search and print the results.
pub(crate) fn run_search(database: Option<PathBuf>, args: SearchArgs) -> Result<(), CliError> {
    let query = build_query(&args)?;

    log::debug!("{}", query.sql());
    if !query.args().is_empty() {
        log::debug!("args: {:?}", query.args());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.show_sql {
        write!(out, "{}", sql_listing(&query))?;
        return Ok(());
    }

    let settings = Settings::resolve(database, args.engine)?;
    log::debug!(
        "Using {} engine on {}",
        settings.engine,
        settings.database.display()
    );

    let executor: Box<dyn QueryExecutor> = match settings.engine {
        Engine::Sqlite => Box::new(SqliteExecutor::open(&settings.database)?),
        Engine::Sqlite3 => Box::new(Sqlite3ShellExecutor::new(settings.database)),
    };

    let result = executor.execute(&query)?;
    render::render(&result, args.format, &mut out)?;
    log::debug!("{} row(s)", result.len());

    Ok(())
}
