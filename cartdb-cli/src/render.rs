//! Result rendering: boxed text table or CSV.

use std::io::Write;

use cartdb_db::{CellValue, QueryResult};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use unicode_width::UnicodeWidthStr;

use crate::CliError;

/// How search results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Boxed text table
    #[default]
    Table,
    /// RFC 4180 CSV with a header row
    Csv,
}

pub(crate) fn render(
    result: &QueryResult,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => render_table(result, out)?,
        OutputFormat::Csv => render_csv(result, out).map_err(|e| CliError::output(e.to_string()))?,
    }
    Ok(())
}

// ── Table ───────────────────────────────────────────────────────────────────

/// Draw a `+---+` boxed table. NULL cells are blank; numbers align right.
/// Nothing is written for an empty result.
fn render_table(result: &QueryResult, out: &mut impl Write) -> std::io::Result<()> {
    if result.is_empty() {
        return Ok(());
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(CellValue::to_string).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|s| s.width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = border_line(&widths);

    writeln!(out, "{border}")?;
    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, &width)| {
            let padded = center(name, width);
            padded.if_supports_color(Stdout, |t| t.bold()).to_string()
        })
        .collect();
    writeln!(out, "| {} |", header.join(" | "))?;
    writeln!(out, "{border}")?;

    for (row, values) in cells.iter().zip(&result.rows) {
        let line: Vec<String> = row
            .iter()
            .zip(values)
            .zip(&widths)
            .map(|((text, value), &width)| {
                if value.is_numeric() {
                    pad_left(text, width)
                } else {
                    pad_right(text, width)
                }
            })
            .collect();
        writeln!(out, "| {} |", line.join(" | "))?;
    }
    writeln!(out, "{border}")?;

    Ok(())
}

fn border_line(widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{text}{}", " ".repeat(width.saturating_sub(text.width())))
}

fn pad_left(text: &str, width: usize) -> String {
    format!("{}{text}", " ".repeat(width.saturating_sub(text.width())))
}

fn center(text: &str, width: usize) -> String {
    let slack = width.saturating_sub(text.width());
    let left = slack / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(slack - left))
}

// ── CSV ─────────────────────────────────────────────────────────────────────

fn render_csv(result: &QueryResult, out: &mut impl Write) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row.iter().map(CellValue::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
