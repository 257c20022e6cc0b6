//! Browse command - pick sheets interactively
//!
//! One dashboard lives for the whole session, so going back to a sheet
//! within the TTL does not hit the network again.

use crate::catalog::{Category, Month, Selection};
use crate::config::Config;
use crate::dashboard::{LiveDashboard, Panel};
use crate::error::{DashError, DashResult};
use crate::ui::{self, TaskSpinner, UiContext};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Another,
    Reload,
    Quit,
}

/// Execute the browse command
pub async fn execute(config: &Config) -> DashResult<()> {
    let ctx = UiContext::detect();
    if !ctx.is_interactive() {
        return Err(DashError::User(
            "browse needs an interactive terminal; use `sheetdash view` instead".to_string(),
        ));
    }

    let dashboard = Arc::new(LiveDashboard::from_config(config)?);
    let max_column_width = config.display.max_column_width;

    ui::intro(&ctx, "sheetdash");

    'session: loop {
        let Some(selection) = pick_selection(&ctx, &dashboard).await? else {
            break;
        };

        let mut fresh = false;
        loop {
            let panel = load(&ctx, &dashboard, &selection, fresh).await?;
            render_panel(&ctx, &panel, max_column_width);

            let options = [
                (Next::Another, "Load another sheet".to_string(), String::new()),
                (Next::Reload, "Reload this sheet".to_string(), "skip the cache".to_string()),
                (Next::Quit, "Quit".to_string(), String::new()),
            ];
            match ui::select(&ctx, "What next?", &options).await? {
                Some(Next::Another) => break,
                Some(Next::Reload) => fresh = true,
                Some(Next::Quit) | None => break 'session,
            }
        }
    }

    let stats = dashboard.cache_stats();
    ui::remark(
        &ctx,
        &format!(
            "{} fetched, {} served from cache, {} failed",
            stats.fetches, stats.hits, stats.failures
        ),
    );
    ui::outro_success(&ctx, "Done");
    Ok(())
}

/// Walk the user through category, country, region and month.
///
/// Returns `None` if any prompt is cancelled.
async fn pick_selection(ctx: &UiContext, dashboard: &LiveDashboard) -> DashResult<Option<Selection>> {
    let categories: Vec<(Category, String, String)> = Category::ALL
        .iter()
        .map(|c| (*c, c.label().to_string(), String::new()))
        .collect();
    let Some(category) = ui::select(ctx, "Dashboard", &categories).await? else {
        return Ok(None);
    };
    let mut selection = Selection::new(category);
    let resolver = dashboard.resolver();

    if category.needs_country() {
        let countries = labelled(resolver.countries(category));
        let Some(country) = ui::select(ctx, "Country", &countries).await? else {
            return Ok(None);
        };

        if category.needs_region() {
            let regions = labelled(resolver.regions(&country)?);
            let Some(region) = ui::select(ctx, "Intern", &regions).await? else {
                return Ok(None);
            };
            selection = selection.with_subselection(region);
        }
        selection = selection.with_country(country);
    }

    if category.needs_month() {
        let months: Vec<(Month, String, String)> = Month::ALL
            .iter()
            .map(|m| (*m, m.name().to_string(), String::new()))
            .collect();
        let Some(month) = ui::select(ctx, "Month", &months).await? else {
            return Ok(None);
        };
        selection = selection.with_month(month.name());
    }

    Ok(Some(selection))
}

fn labelled(names: Vec<&str>) -> Vec<(String, String, String)> {
    names
        .into_iter()
        .map(|n| (n.to_string(), n.to_string(), String::new()))
        .collect()
}

async fn load(
    ctx: &UiContext,
    dashboard: &Arc<LiveDashboard>,
    selection: &Selection,
    fresh: bool,
) -> DashResult<Panel> {
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("Loading {}...", selection.category.label()));

    let dashboard = Arc::clone(dashboard);
    let selection = selection.clone();
    let panel = tokio::task::spawn_blocking(move || {
        if fresh {
            dashboard.show_fresh(&selection)
        } else {
            dashboard.show(&selection)
        }
    })
    .await
    .map_err(|e| DashError::Internal(format!("Load task failed: {}", e)))?;

    match &panel {
        Panel::Loaded(view) => spinner.stop(&view.title),
        Panel::Failed { .. } => spinner.clear(),
    }
    Ok(panel)
}

fn render_panel(ctx: &UiContext, panel: &Panel, max_column_width: usize) {
    match panel {
        Panel::Loaded(view) => {
            ui::section(ctx, &view.title);
            if view.cached {
                let age = view.fetched_at.format("%H:%M:%S UTC").to_string();
                ui::step_ok_detail(ctx, &view.summary(), &format!("from cache, fetched {}", age));
            } else {
                ui::step_ok(ctx, &view.summary());
            }

            if view.table.is_empty() {
                ui::step_info(ctx, "The sheet has a header but no rows");
                return;
            }
            println!();
            ui::print_grid(ctx, &view.table, max_column_width);
            println!();
        }
        Panel::Failed {
            message,
            hint,
            retryable,
            ..
        } => {
            ui::step_error_hint(ctx, message, failure_hint(*hint, *retryable));
        }
    }
}

/// The error's own hint, else a retry nudge for transient failures
fn failure_hint(hint: Option<&'static str>, retryable: bool) -> Option<&'static str> {
    hint.or(retryable.then_some("Pick \"Reload this sheet\" to try again"))
}
