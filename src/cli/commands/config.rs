//! Config command - show or edit configuration

use crate::catalog::Resolver;
use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_FILE};
use crate::error::{DashError, DashResult};
use crate::ui::{self, UiContext};
use tokio::fs;

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> DashResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(manager, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> DashResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> DashResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

/// Update one key in the global file.
///
/// Only the global file is read here so a local override is never copied
/// into it.
async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> DashResult<()> {
    let ctx = UiContext::detect();
    let mut config = manager.load().await?;

    apply_key(&mut config, key, value)?;
    Resolver::from_sources(&config.sources)?;

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a dot-separated key to a typed config
fn apply_key(config: &mut Config, key: &str, value: &str) -> DashResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,

        ["http", "timeout_secs"] => config.http.timeout_secs = parse_u64(value)?,
        ["http", "user_agent"] => config.http.user_agent = value.to_string(),
        ["http", "max_body_bytes"] => config.http.max_body_bytes = parse_u64(value)?,

        ["cache", "ttl_secs"] => config.cache.ttl_secs = parse_u64(value)?,

        ["display", "max_column_width"] => {
            config.display.max_column_width = parse_u64(value)? as usize
        }

        ["sources", "export_url_template"] => {
            config.sources.export_url_template = value.to_string()
        }
        ["sources", "primary_sales_sheet"] => {
            config.sources.primary_sales_sheet = value.to_string()
        }
        ["sources", "conversations", country] => {
            config
                .sources
                .conversations
                .insert((*country).to_string(), value.to_string());
        }
        ["sources", "leads", country, intern] => {
            config
                .sources
                .leads
                .entry((*country).to_string())
                .or_default()
                .insert((*intern).to_string(), value.to_string());
        }

        _ => return Err(unknown_key(key)),
    }

    Ok(())
}

async fn set_local_value(key: &str, value: &str) -> DashResult<()> {
    let ctx = UiContext::detect();

    let cwd = std::env::current_dir().map_err(|e| DashError::io("getting current directory", e))?;
    let local_path = cwd.join(LOCAL_CONFIG_FILE);

    // Check key and value against a scratch config before touching the file
    apply_key(&mut Config::default(), key, value)?;

    let mut doc: toml::Value = if local_path.exists() {
        let content = fs::read_to_string(&local_path)
            .await
            .map_err(|e| DashError::io(format!("reading {}", local_path.display()), e))?;
        content
            .parse()
            .map_err(|e: toml::de::Error| DashError::ConfigInvalid {
                path: local_path.clone(),
                reason: e.to_string(),
            })?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };

    set_toml_value(&mut doc, key, value)?;

    // Write back only the keys the user has explicitly set
    let content = toml::to_string_pretty(&doc)?;
    fs::write(&local_path, content)
        .await
        .map_err(|e| DashError::io(format!("writing {}", local_path.display()), e))?;

    ui::step_ok(
        &ctx,
        &format!("Set {} = {} in {}", key, value, local_path.display()),
    );

    Ok(())
}

/// Set a dot-separated key in a TOML value tree, creating intermediate tables as needed.
fn set_toml_value(doc: &mut toml::Value, key: &str, value: &str) -> DashResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, parents)) = parts.split_last() else {
        return Err(unknown_key(key));
    };

    let mut current = doc;
    for &part in parents {
        current = current
            .as_table_mut()
            .ok_or_else(|| DashError::User(format!("Expected table at key: {}", part)))?
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| DashError::User(format!("Expected table for key: {}", key)))?;

    // Sheet ids and URLs stay strings even when they look numeric
    let toml_value = match value.parse::<i64>() {
        Ok(n) if parts[0] != "sources" => toml::Value::Integer(n),
        _ => toml::Value::String(value.to_string()),
    };

    table.insert((*leaf).to_string(), toml_value);
    Ok(())
}

fn parse_u64(value: &str) -> DashResult<u64> {
    value
        .parse()
        .map_err(|_| DashError::User(format!("Invalid number: {}", value)))
}

fn parse_log_format(value: &str) -> DashResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(DashError::User(format!(
            "Invalid log format: {}. Use text or json",
            value
        ))),
    }
}

fn unknown_key(key: &str) -> DashError {
    DashError::User(format!(
        "Unknown config key: {}. Valid keys: {}",
        key,
        VALID_KEYS.join(", ")
    ))
}

const VALID_KEYS: [&str; 10] = [
    "general.log_format",
    "http.timeout_secs",
    "http.user_agent",
    "http.max_body_bytes",
    "cache.ttl_secs",
    "display.max_column_width",
    "sources.export_url_template",
    "sources.primary_sales_sheet",
    "sources.conversations.<country>",
    "sources.leads.<country>.<intern>",
];
