//! Configuration schema for sheetdash
//!
//! Configuration is stored at `~/.config/sheetdash/config.toml`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Table cache settings
    pub cache: CacheConfig,

    /// Grid rendering settings
    pub display: DisplayConfig,

    /// Published sheets
    pub sources: SourcesConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Largest response body accepted, in bytes
    pub max_body_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("sheetdash/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched table stays fresh (default: 1 hour)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

/// Grid rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Cells wider than this are cut with an ellipsis (0 = no limit)
    pub max_column_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_column_width: 40,
        }
    }
}

/// Published sheet configuration
///
/// Maps are keyed by display name, so they list alphabetically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// CSV export URL with `{sheet_id}` and `{sheet}` placeholders
    pub export_url_template: String,

    /// Spreadsheet whose month tabs hold primary sales leads
    pub primary_sales_sheet: String,

    /// Campaign conversation spreadsheet per country
    pub conversations: BTreeMap<String, String>,

    /// Leads export URL per country, then per intern or region
    pub leads: BTreeMap<String, BTreeMap<String, String>>,
}

pub const DEFAULT_EXPORT_URL_TEMPLATE: &str =
    "https://docs.google.com/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv&sheet={sheet}";

impl Default for SourcesConfig {
    fn default() -> Self {
        let leads_mexico = BTreeMap::from([(
            "Intern 1".to_string(),
            "https://docs.google.com/spreadsheets/d/1nALlHhcBTFGqhHEOgxc2vLg6Wq7kr4n7EFeDeC9M3ho/gviz/tq?tqx=out:csv&sheet=Data%20Sheet".to_string(),
        )]);
        let leads_india = BTreeMap::from([(
            "Intern 1".to_string(),
            "https://docs.google.com/spreadsheets/d/1aEsnXfmDTg4XVIPQ4HdGZqjfg1jO-WtyC2nW67qqkuU/gviz/tq?tqx=out:csv&sheet=Data%20Sheet".to_string(),
        )]);

        Self {
            export_url_template: DEFAULT_EXPORT_URL_TEMPLATE.to_string(),
            primary_sales_sheet: "1LezlwNw1tj2DyRUBHZeTVHagczE_-gJKZ45PLpGvf0w".to_string(),
            conversations: BTreeMap::from([
                (
                    "Mexico".to_string(),
                    "1-INGrynbGU7IBLXggsoH9eFvAwgXPjPcFT_OOCPlgJA".to_string(),
                ),
                (
                    "India".to_string(),
                    "1hHZCqXmQP-yd7X-WjJBWKCY2s-YENLj2dYtFXNWjOq4".to_string(),
                ),
            ]),
            leads: BTreeMap::from([
                ("Mexico".to_string(), leads_mexico),
                ("India".to_string(), leads_india),
            ]),
        }
    }
}
