//! CSV parsing for sheet exports
//!
//! Quotes, `""` escapes, embedded newlines, CRLF and a leading BOM are
//! accepted. Blank lines are skipped. The first record is the header.
//!
//! Ragged rows: short rows are padded with empty cells, fields past the
//! header width are dropped.

use super::{Cell, Table};
use std::io::{self, Write};
use std::mem::take;
use thiserror::Error;
use tracing::debug;

/// Why a CSV body could not be turned into a table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct CsvError {
    pub line: usize,
    pub reason: String,
}

/// Parse a full CSV body into a [`Table`]
pub fn parse_csv(text: &str) -> Result<Table, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text)?.into_iter();

    let header = records.next().ok_or_else(|| CsvError {
        line: 1,
        reason: "no header row".to_string(),
    })?;
    let columns = header_names(header);
    let width = columns.len();

    let mut padded = 0usize;
    let mut truncated = 0usize;
    let rows: Vec<Vec<Cell>> = records
        .map(|fields| {
            if fields.len() < width {
                padded += 1;
            } else if fields.len() > width {
                truncated += 1;
            }
            fields.iter().take(width).map(|f| Cell::infer(f)).collect()
        })
        .collect();

    if padded > 0 || truncated > 0 {
        debug!(
            "Ragged CSV: padded {} short row(s), truncated {} long row(s)",
            padded, truncated
        );
    }

    Ok(Table::new(columns, rows))
}

/// Split text into records of raw fields.
///
/// Fails only on a quoted field left open at end of input.
fn split_records(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_opened_at = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                    quote_opened_at = line;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                line += 1;
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => {
                if ch == '\n' {
                    line += 1;
                }
                field.push(ch);
            }
        }
    }

    if in_quotes {
        return Err(CsvError {
            line: quote_opened_at,
            reason: "unterminated quoted field".to_string(),
        });
    }

    row.push(field);
    push_row(&mut rows, row);
    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.len() == 1 && row[0].is_empty();
    if !blank {
        rows.push(row);
    }
}

/// Normalize header names: blank → `Unnamed: i`, repeats → `name.1`, `name.2`
fn header_names(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (index, name) in raw.into_iter().enumerate() {
        let name = name.trim().to_string();
        let base = if name.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    writeln!(w)
}

/// Write a table back out as CSV, header first
pub fn write_csv<W: Write>(mut w: W, table: &Table) -> io::Result<()> {
    write_row(&mut w, table.columns())?;
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
        write_row(&mut w, &cells)?;
    }
    w.flush()
}
