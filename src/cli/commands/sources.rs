//! Sources command - list what can be selected

use crate::catalog::{Category, Month, Resolver};
use crate::cli::args::{OutputFormat, SourcesArgs};
use crate::config::Config;
use crate::error::DashResult;
use crate::ui::{self, UiContext};
use console::style;
use serde_json::json;

/// Execute the sources command
pub async fn execute(args: SourcesArgs, config: &Config) -> DashResult<()> {
    let resolver = Resolver::from_sources(&config.sources)?;

    match args.format {
        OutputFormat::Table => print_table(&resolver)?,
        OutputFormat::Json => print_json(&resolver)?,
        OutputFormat::Plain | OutputFormat::Csv => print_plain(&resolver)?,
    }

    Ok(())
}

fn print_table(resolver: &Resolver) -> DashResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Sources");

    for category in Category::ALL {
        ui::section(&ctx, category.label());
        match category {
            Category::Leads => {
                for country in resolver.countries(category) {
                    let regions = resolver.regions(country)?;
                    println!("  {:<12} {}", style(country).bold(), regions.join(", "));
                }
            }
            Category::CampaignConversation => {
                let countries = resolver.countries(category);
                println!("  {}", countries.join(", "));
                println!("  {}", style("one tab per month").dim());
            }
            Category::PrimarySalesLeads => {
                println!("  {}", style("one tab per month").dim());
            }
        }
    }

    println!();
    let months: Vec<&str> = Month::ALL.iter().map(|m| m.name()).collect();
    ui::remark(&ctx, &format!("Months: {}", months.join(", ")));
    Ok(())
}

fn print_json(resolver: &Resolver) -> DashResult<()> {
    let mut leads = serde_json::Map::new();
    for country in resolver.countries(Category::Leads) {
        let regions = resolver.regions(country)?;
        leads.insert(country.to_string(), json!(regions));
    }

    let doc = json!({
        "leads": leads,
        "conversations": resolver.countries(Category::CampaignConversation),
        "months": Month::ALL.iter().map(|m| m.name()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

/// One line per selectable sheet, tab-separated
fn print_plain(resolver: &Resolver) -> DashResult<()> {
    for country in resolver.countries(Category::Leads) {
        for region in resolver.regions(country)? {
            println!("{}\t{}\t{}", Category::Leads.label(), country, region);
        }
    }
    for country in resolver.countries(Category::CampaignConversation) {
        println!("{}\t{}", Category::CampaignConversation.label(), country);
    }
    println!("{}", Category::PrimarySalesLeads.label());
    Ok(())
}
