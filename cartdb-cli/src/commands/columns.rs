use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// List the names `--order-by` accepts.
pub(crate) fn run_columns() {
    log::info!(
        "{}",
        "Output columns".if_supports_color(Stdout, |t| t.bold()),
    );
    let optional = cartdb_query::optional_column(cartdb_query::CHIP_TYPE).ok();
    for column in cartdb_query::base_columns().iter().chain(optional.iter()) {
        log::info!(
            "  {:<12} {}",
            column.output_name(),
            column.qualified().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    crate::log_blank();
    log::info!(
        "{}",
        "Qualified names".if_supports_color(Stdout, |t| t.bold()),
    );
    for column in cartdb_query::all_columns() {
        log::info!("  {}", column.qualified());
    }
}
