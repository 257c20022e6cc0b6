//! Plain-text grid rendering for tables

use super::context::UiContext;
use crate::table::{Cell, Table};
use console::{measure_text_width, pad_str, truncate_str, Alignment};

/// Header line, separator line, then one line per row.
///
/// A leading index column numbers rows from 0. Cells wider than
/// `max_column_width` are cut with an ellipsis (0 disables the cut).
pub fn render_grid(table: &Table, max_column_width: usize) -> Vec<String> {
    let index_width = table.row_count().saturating_sub(1).to_string().len();

    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let widest = body
                .iter()
                .map(|row| measure_text_width(&row[i]))
                .chain(std::iter::once(measure_text_width(name)))
                .max()
                .unwrap_or(0);
            if max_column_width > 0 {
                widest.min(max_column_width)
            } else {
                widest
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 2);

    let header: Vec<String> = table
        .columns()
        .iter()
        .zip(&widths)
        .map(|(name, &w)| fit(name, w, Alignment::Left))
        .collect();
    lines.push(join(" ".repeat(index_width), header));

    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    lines.push(join("─".repeat(index_width), rule));

    for (n, (row, cells)) in table.rows().iter().zip(&body).enumerate() {
        let rendered: Vec<String> = cells
            .iter()
            .zip(row)
            .zip(&widths)
            .map(|((text, cell), &w)| {
                let align = match cell {
                    Cell::Number(_) => Alignment::Right,
                    _ => Alignment::Left,
                };
                fit(text, w, align)
            })
            .collect();
        lines.push(join(format!("{:>width$}", n, width = index_width), rendered));
    }

    lines
}

/// Print the grid to stdout, clipped to the terminal width when interactive
pub fn print_grid(ctx: &UiContext, table: &Table, max_column_width: usize) {
    for line in render_grid(table, max_column_width) {
        if ctx.is_interactive() {
            println!("{}", truncate_str(&line, ctx.width(), "…"));
        } else {
            println!("{}", line);
        }
    }
}

fn display_cell(cell: &Cell) -> String {
    cell.to_string().replace(['\r', '\n'], " ")
}

fn fit(text: &str, width: usize, align: Alignment) -> String {
    let cut = truncate_str(text, width, "…");
    pad_str(&cut, width, align, None).into_owned()
}

fn join(index: String, cells: Vec<String>) -> String {
    let mut line = index;
    for cell in cells {
        line.push_str("  ");
        line.push_str(&cell);
    }
    line.trim_end().to_string()
}
