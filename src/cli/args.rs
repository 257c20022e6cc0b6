//! CLI argument definitions using clap derive

use crate::catalog::Category;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// sheetdash - lead, campaign and sales sheets in the terminal
///
/// Fetches published Google Sheets as CSV and renders them as tables.
/// Tables are cached in memory for the configured TTL.
#[derive(Parser, Debug)]
#[command(name = "sheetdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SHEETDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .sheetdash.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load one sheet and print it
    View(ViewArgs),

    /// Pick sheets interactively, reusing fetched tables
    Browse,

    /// Print the CSV export URL a selection resolves to
    Url(SelectionArgs),

    /// List categories, countries, interns and months
    Sources(SourcesArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Which sheet to load
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Sheet category
    #[arg(value_enum)]
    pub category: Category,

    /// Country (leads, conversations)
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// Intern or region (leads; defaults to the first one listed)
    #[arg(short, long)]
    pub intern: Option<String>,

    /// Month tab, e.g. March (conversations, sales)
    #[arg(short, long)]
    pub month: Option<String>,
}

/// Arguments for the view command
#[derive(Parser, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the sources command
#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.ttl_secs, sources.conversations.Peru)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .sheetdash.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for tables and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Tab-separated text, no styling
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_view() {
        let cli = Cli::parse_from([
            "sheetdash", "view", "leads", "--country", "Mexico", "--intern", "Intern 1",
        ]);
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.selection.category, Category::Leads);
                assert_eq!(args.selection.country.as_deref(), Some("Mexico"));
                assert_eq!(args.selection.intern.as_deref(), Some("Intern 1"));
                assert_eq!(args.format, OutputFormat::Table);
            }
            _ => panic!("expected View command"),
        }
    }

    #[test]
    fn cli_parses_category_aliases() {
        let cli = Cli::parse_from(["sheetdash", "url", "primary-sales-leads", "-m", "March"]);
        match cli.command {
            Commands::Url(args) => {
                assert_eq!(args.category, Category::PrimarySalesLeads);
                assert_eq!(args.month.as_deref(), Some("March"));
            }
            _ => panic!("expected Url command"),
        }

        let cli = Cli::parse_from(["sheetdash", "url", "campaign", "-C", "India", "-m", "May"]);
        match cli.command {
            Commands::Url(args) => assert_eq!(args.category, Category::CampaignConversation),
            _ => panic!("expected Url command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["sheetdash", "view", "inventory"]).is_err());
    }

    #[test]
    fn cli_parses_view_format() {
        let cli = Cli::parse_from(["sheetdash", "view", "sales", "-m", "June", "-f", "json"]);
        match cli.command {
            Commands::View(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected View command"),
        }
    }

    #[test]
    fn cli_parses_browse() {
        let cli = Cli::parse_from(["sheetdash", "browse"]);
        assert!(matches!(cli.command, Commands::Browse));
    }

    #[test]
    fn cli_parses_config_set_local() {
        let cli = Cli::parse_from(["sheetdash", "config", "set", "cache.ttl_secs", "60", "--local"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value, local }),
            }) => {
                assert_eq!(key, "cache.ttl_secs");
                assert_eq!(value, "60");
                assert!(local);
            }
            _ => panic!("expected Config Set command"),
        }
    }

    #[test]
    fn cli_no_local_flag() {
        let cli = Cli::parse_from(["sheetdash", "--no-local", "sources"]);
        assert!(cli.no_local);
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["sheetdash", "sources"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["sheetdash", "-v", "sources"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["sheetdash", "-vv", "sources"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
