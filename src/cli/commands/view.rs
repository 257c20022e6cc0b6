//! View command - load one sheet and print it

use super::selection_from_args;
use crate::cli::args::{OutputFormat, ViewArgs};
use crate::config::Config;
use crate::dashboard::{LiveDashboard, View};
use crate::error::{DashError, DashResult};
use crate::table::{write_csv, Table};
use crate::ui::{self, TaskSpinner, UiContext};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

/// Execute the view command
pub async fn execute(args: ViewArgs, config: &Config) -> DashResult<()> {
    let dashboard = Arc::new(LiveDashboard::from_config(config)?);
    let category = args.selection.category;
    let selection = selection_from_args(dashboard.resolver(), &args.selection)
        .map_err(|e| DashError::load(category.failure_prefix(), e))?;

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    if args.format == OutputFormat::Table {
        spinner.start(&format!("Loading {}...", category.label()));
    }

    let loader = Arc::clone(&dashboard);
    let result = tokio::task::spawn_blocking(move || loader.open(&selection))
        .await
        .map_err(|e| DashError::Internal(format!("Load task failed: {}", e)))?;

    let view = match result {
        Ok(view) => {
            spinner.stop(&view.title);
            view
        }
        Err(e) => {
            spinner.clear();
            return Err(DashError::load(category.failure_prefix(), e));
        }
    };
    debug!("Loaded {} ({} rows)", view.target, view.row_count);

    match args.format {
        OutputFormat::Table => print_table(&ctx, &view, config.display.max_column_width),
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Csv => print_csv(&view.table)?,
        OutputFormat::Plain => print_plain(&view.table),
    }

    Ok(())
}

fn print_table(ctx: &UiContext, view: &View, max_column_width: usize) {
    ui::section(ctx, &view.title);
    ui::step_ok(ctx, &view.summary());

    if view.table.is_empty() {
        ui::step_info(ctx, "The sheet has a header but no rows");
    } else {
        println!();
        ui::print_grid(ctx, &view.table, max_column_width);
    }

    println!();
    let fetched = view.fetched_at.format("%Y-%m-%d %H:%M:%S UTC");
    ui::remark(ctx, &format!("Source: {} (fetched {})", view.target, fetched));
}

fn print_json(view: &View) -> DashResult<()> {
    let doc = json!({
        "title": view.title,
        "category": view.category.label(),
        "source": view.target.as_str(),
        "row_count": view.row_count,
        "fetched_at": view.fetched_at.to_rfc3339(),
        "columns": view.table.columns(),
        "rows": &*view.table,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn print_csv(table: &Table) -> DashResult<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), table).map_err(|e| DashError::io("writing CSV to stdout", e))
}

fn print_plain(table: &Table) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "{}", table.columns().join("\t"));
    for row in table.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.to_string().replace(['\t', '\n', '\r'], " "))
            .collect();
        let _ = writeln!(out, "{}", cells.join("\t"));
    }
}
