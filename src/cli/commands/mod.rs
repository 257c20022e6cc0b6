//! CLI command implementations

pub mod browse;
pub mod completions;
pub mod config;
pub mod sources;
pub mod url;
pub mod view;

pub use browse::execute as browse;
pub use completions::execute as completions;
pub use config::execute as config;
pub use sources::execute as sources;
pub use url::execute as url;
pub use view::execute as view;

use crate::catalog::{Category, Resolver, Selection};
use crate::cli::args::SelectionArgs;
use crate::error::DashResult;

/// Turn command-line flags into a [`Selection`].
///
/// Leads without `--intern` fall back to the country's first listed region.
pub(crate) fn selection_from_args(
    resolver: &Resolver,
    args: &SelectionArgs,
) -> DashResult<Selection> {
    let mut selection = Selection::new(args.category);

    if let Some(country) = &args.country {
        selection = selection.with_country(country.as_str());
    }

    match (&args.intern, args.category, &args.country) {
        (Some(intern), _, _) => selection = selection.with_subselection(intern.as_str()),
        (None, Category::Leads, Some(country)) => {
            let region = resolver.default_region(country)?;
            selection = selection.with_subselection(region);
        }
        _ => {}
    }

    if let Some(month) = &args.month {
        selection = selection.with_month(month.as_str());
    }

    Ok(selection)
}
