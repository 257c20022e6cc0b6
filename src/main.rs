//! sheetdash - terminal dashboard over published Google Sheets
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use sheetdash::cli::{commands, Cli, Commands};
use sheetdash::config::{Config, ConfigManager};
use sheetdash::error::{DashError, DashResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DashResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        return commands::completions(args);
    }

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| DashError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    debug!("Config file: {}", config_manager.path().display());
    match &local_config_path {
        Some(path) => debug!("Local config: {}", path.display()),
        None if cli.no_local => debug!("Local config discovery disabled (--no-local)"),
        None => {}
    }

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::View(args) => commands::view(args, &config).await,
        Commands::Browse => commands::browse(&config).await,
        Commands::Url(args) => commands::url(args, &config).await,
        Commands::Sources(args) => commands::sources(args, &config).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}

/// Logs go to stderr so table, JSON and CSV output on stdout stay clean.
///
/// 0 = warn, 1 = info, 2+ = debug. `RUST_LOG` overrides when set.
fn init_logging(verbose: u8, config: &Config) {
    let default = match verbose {
        0 => "sheetdash=warn",
        1 => "sheetdash=info",
        _ => "sheetdash=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
