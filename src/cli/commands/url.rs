//! Url command - print the export URL for a selection without fetching it

use super::selection_from_args;
use crate::catalog::Resolver;
use crate::cli::args::SelectionArgs;
use crate::config::Config;
use crate::error::DashResult;

/// Execute the url command
pub async fn execute(args: SelectionArgs, config: &Config) -> DashResult<()> {
    let resolver = Resolver::from_sources(&config.sources)?;
    let selection = selection_from_args(&resolver, &args)?;
    let resolved = resolver.resolve_selection(&selection)?;

    println!("{}", resolved.target);
    Ok(())
}
