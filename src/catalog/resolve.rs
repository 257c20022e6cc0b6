//! Selection resolution
//!
//! Maps a (category, country, intern/region, month) selection to the CSV
//! export URL of one published sheet:
//! - Leads: the stored per-intern URL, returned verbatim
//! - Campaign Conversation: the country's spreadsheet, month as tab name
//! - Primary Sales Leads: the single sales spreadsheet, month as tab name

use super::{Category, Month};
use crate::config::schema::SourcesConfig;
use crate::error::{DashError, DashResult};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

const SHEET_ID_PLACEHOLDER: &str = "{sheet_id}";
const SHEET_PLACEHOLDER: &str = "{sheet}";

/// URL of one remote CSV resource; equal strings are the same resource
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTarget(String);

impl FetchTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FetchTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw user selection, as typed or picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub country: Option<String>,
    /// Intern or region, only meaningful for leads
    pub subselection: Option<String>,
    pub month: Option<String>,
}

impl Selection {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            country: None,
            subselection: None,
            month: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_subselection(mut self, subselection: impl Into<String>) -> Self {
        self.subselection = Some(subselection.into());
        self
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }
}

/// A selection checked against the catalog, with canonical names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub category: Category,
    pub country: Option<String>,
    pub region: Option<String>,
    pub month: Option<Month>,
    pub target: FetchTarget,
}

impl Resolved {
    /// Panel heading for this selection
    pub fn title(&self) -> String {
        let country = self.country.as_deref().unwrap_or_default();
        let month = self.month.map(Month::name).unwrap_or_default();
        match self.category {
            Category::Leads => format!(
                "Leads Data - {} → {}",
                country,
                self.region.as_deref().unwrap_or_default()
            ),
            Category::CampaignConversation => {
                format!("Campaign Conversation - {} ({})", country, month)
            }
            Category::PrimarySalesLeads => format!("Primary Sales Leads - {}", month),
        }
    }
}

/// Read-only sheet tables, validated once at startup
#[derive(Debug, Clone)]
pub struct Resolver {
    url_template: String,
    primary_sales_sheet: String,
    conversations: BTreeMap<String, String>,
    leads: BTreeMap<String, BTreeMap<String, String>>,
}

impl Resolver {
    /// Build a resolver from the configured sources
    pub fn from_sources(sources: &SourcesConfig) -> DashResult<Self> {
        let template = sources.export_url_template.trim();
        for placeholder in [SHEET_ID_PLACEHOLDER, SHEET_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(DashError::CatalogInvalid(format!(
                    "export_url_template is missing {}",
                    placeholder
                )));
            }
        }
        if !is_http_url(template) {
            return Err(DashError::CatalogInvalid(format!(
                "export_url_template is not an http(s) URL: {}",
                template
            )));
        }

        if sources.primary_sales_sheet.trim().is_empty() {
            return Err(DashError::CatalogInvalid(
                "primary_sales_sheet is empty".to_string(),
            ));
        }

        if let Some((country, _)) = sources
            .conversations
            .iter()
            .find(|(_, id)| id.trim().is_empty())
        {
            return Err(DashError::CatalogInvalid(format!(
                "conversation sheet id for {} is empty",
                country
            )));
        }

        for (country, regions) in &sources.leads {
            if regions.is_empty() {
                return Err(DashError::CatalogInvalid(format!(
                    "leads for {} list no interns or regions",
                    country
                )));
            }
            if let Some((region, url)) = regions.iter().find(|(_, url)| !is_http_url(url)) {
                return Err(DashError::CatalogInvalid(format!(
                    "leads URL for {} / {} is not an http(s) URL: {}",
                    country, region, url
                )));
            }
        }

        Ok(Self {
            url_template: template.to_string(),
            primary_sales_sheet: sources.primary_sales_sheet.trim().to_string(),
            conversations: sources.conversations.clone(),
            leads: sources.leads.clone(),
        })
    }

    /// Resolve a selection to the URL of its CSV export
    pub fn resolve(
        &self,
        category: Category,
        country: Option<&str>,
        subselection: Option<&str>,
        month: Option<&str>,
    ) -> DashResult<FetchTarget> {
        let selection = Selection {
            category,
            country: country.map(str::to_string),
            subselection: subselection.map(str::to_string),
            month: month.map(str::to_string),
        };
        self.resolve_selection(&selection).map(|r| r.target)
    }

    /// Resolve a selection, keeping the canonical names it matched
    pub fn resolve_selection(&self, selection: &Selection) -> DashResult<Resolved> {
        let resolved = match selection.category {
            Category::Leads => {
                let (country, regions) =
                    lookup(&self.leads, "country", selection.country.as_deref())?;
                let (region, url) =
                    lookup(regions, "intern", selection.subselection.as_deref())?;
                Resolved {
                    category: Category::Leads,
                    country: Some(country.clone()),
                    region: Some(region.clone()),
                    month: None,
                    target: FetchTarget::new(url.clone()),
                }
            }
            Category::CampaignConversation => {
                let (country, sheet_id) =
                    lookup(&self.conversations, "country", selection.country.as_deref())?;
                let month = parse_month(selection.month.as_deref())?;
                Resolved {
                    category: Category::CampaignConversation,
                    country: Some(country.clone()),
                    region: None,
                    month: Some(month),
                    target: self.export_url(sheet_id, month.name()),
                }
            }
            Category::PrimarySalesLeads => {
                let month = parse_month(selection.month.as_deref())?;
                Resolved {
                    category: Category::PrimarySalesLeads,
                    country: None,
                    region: None,
                    month: Some(month),
                    target: self.export_url(&self.primary_sales_sheet, month.name()),
                }
            }
        };

        debug!("Resolved {:?} to {}", selection, resolved.target);
        Ok(resolved)
    }

    fn export_url(&self, sheet_id: &str, sheet: &str) -> FetchTarget {
        FetchTarget::new(
            self.url_template
                .replace(SHEET_ID_PLACEHOLDER, sheet_id)
                .replace(SHEET_PLACEHOLDER, &encode_sheet_name(sheet)),
        )
    }

    /// Countries selectable for a category (empty for primary sales)
    pub fn countries(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Leads => self.leads.keys().map(String::as_str).collect(),
            Category::CampaignConversation => {
                self.conversations.keys().map(String::as_str).collect()
            }
            Category::PrimarySalesLeads => Vec::new(),
        }
    }

    /// Interns or regions with a leads sheet in `country`
    pub fn regions(&self, country: &str) -> DashResult<Vec<&str>> {
        let (_, regions) = lookup(&self.leads, "country", Some(country))?;
        Ok(regions.keys().map(String::as_str).collect())
    }

    /// First intern or region listed for `country`
    pub fn default_region(&self, country: &str) -> DashResult<&str> {
        let (_, regions) = lookup(&self.leads, "country", Some(country))?;
        regions
            .keys()
            .next()
            .map(String::as_str)
            .ok_or(DashError::MissingSelection { field: "intern" })
    }
}

/// Find `key` exactly, then ignoring ASCII case
fn lookup<'a, V>(
    table: &'a BTreeMap<String, V>,
    field: &'static str,
    key: Option<&str>,
) -> DashResult<(&'a String, &'a V)> {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(DashError::MissingSelection { field })?;

    table
        .get_key_value(key)
        .or_else(|| table.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
        .ok_or_else(|| DashError::UnknownSelection {
            field,
            value: key.to_string(),
        })
}

fn parse_month(month: Option<&str>) -> DashResult<Month> {
    month
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(DashError::MissingSelection { field: "month" })?
        .parse()
}

/// Percent-encode spaces in a tab name; month names need nothing else
fn encode_sheet_name(name: &str) -> String {
    name.replace(' ', "%20")
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEXICO_LEADS: &str = "https://docs.google.com/spreadsheets/d/1nALlHhcBTFGqhHEOgxc2vLg6Wq7kr4n7EFeDeC9M3ho/gviz/tq?tqx=out:csv&sheet=Data%20Sheet";

    fn resolver() -> Resolver {
        Resolver::from_sources(&SourcesConfig::default()).unwrap()
    }

    #[test]
    fn leads_returns_stored_url() {
        let target = resolver()
            .resolve(Category::Leads, Some("Mexico"), Some("Intern 1"), None)
            .unwrap();
        assert_eq!(target.as_str(), MEXICO_LEADS);
    }

    #[test]
    fn leads_unknown_country() {
        let err = resolver()
            .resolve(Category::Leads, Some("Brazil"), Some("Intern 1"), None)
            .unwrap_err();
        assert!(matches!(
            err,
            DashError::UnknownSelection { field: "country", ref value } if value == "Brazil"
        ));
    }

    #[test]
    fn leads_unknown_intern() {
        let err = resolver()
            .resolve(Category::Leads, Some("India"), Some("Intern 9"), None)
            .unwrap_err();
        assert!(matches!(err, DashError::UnknownSelection { field: "intern", .. }));
    }

    #[test]
    fn leads_missing_intern() {
        let err = resolver()
            .resolve(Category::Leads, Some("India"), None, None)
            .unwrap_err();
        assert!(matches!(err, DashError::MissingSelection { field: "intern" }));
    }

    #[test]
    fn conversation_builds_export_url() {
        let target = resolver()
            .resolve(
                Category::CampaignConversation,
                Some("India"),
                None,
                Some("July"),
            )
            .unwrap();
        assert_eq!(
            target.as_str(),
            "https://docs.google.com/spreadsheets/d/1hHZCqXmQP-yd7X-WjJBWKCY2s-YENLj2dYtFXNWjOq4/gviz/tq?tqx=out:csv&sheet=July"
        );
    }

    #[test]
    fn conversation_encodes_spaces_in_tab_name() {
        let resolver = resolver();
        let target = resolver.export_url("abc", "Week 1");
        assert!(target.as_str().ends_with("sheet=Week%201"));
    }

    #[test]
    fn conversation_requires_month() {
        let err = resolver()
            .resolve(Category::CampaignConversation, Some("Mexico"), None, None)
            .unwrap_err();
        assert!(matches!(err, DashError::MissingSelection { field: "month" }));
    }

    #[test]
    fn primary_sales_uses_month_as_tab() {
        let target = resolver()
            .resolve(Category::PrimarySalesLeads, None, None, Some("March"))
            .unwrap();
        assert!(target.as_str().contains("sheet=March"));
        assert!(target
            .as_str()
            .contains("1LezlwNw1tj2DyRUBHZeTVHagczE_-gJKZ45PLpGvf0w"));
    }

    #[test]
    fn primary_sales_unknown_month() {
        let err = resolver()
            .resolve(Category::PrimarySalesLeads, None, None, Some("Thermidor"))
            .unwrap_err();
        assert!(matches!(err, DashError::UnknownSelection { field: "month", .. }));
    }

    #[test]
    fn every_configured_combination_resolves() {
        let resolver = resolver();
        for category in Category::ALL {
            for month in Month::ALL {
                let countries = if category.needs_country() {
                    resolver.countries(category)
                } else {
                    vec![""]
                };
                for country in countries {
                    let regions = if category.needs_region() {
                        resolver.regions(country).unwrap()
                    } else {
                        vec![""]
                    };
                    for region in regions {
                        let target = resolver
                            .resolve(category, Some(country), Some(region), Some(month.name()))
                            .unwrap();
                        assert!(target.as_str().starts_with("https://docs.google.com/"));
                        assert!(target.as_str().contains("tqx=out:csv"));
                    }
                }
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let resolved = resolver()
            .resolve_selection(
                &Selection::new(Category::CampaignConversation)
                    .with_country("mexico")
                    .with_month("january"),
            )
            .unwrap();
        assert_eq!(resolved.country.as_deref(), Some("Mexico"));
        assert_eq!(resolved.title(), "Campaign Conversation - Mexico (January)");
    }

    #[test]
    fn titles_follow_category() {
        let resolver = resolver();
        let leads = resolver
            .resolve_selection(
                &Selection::new(Category::Leads)
                    .with_country("India")
                    .with_subselection("Intern 1"),
            )
            .unwrap();
        assert_eq!(leads.title(), "Leads Data - India → Intern 1");

        let sales = resolver
            .resolve_selection(&Selection::new(Category::PrimarySalesLeads).with_month("May"))
            .unwrap();
        assert_eq!(sales.title(), "Primary Sales Leads - May");
    }

    #[test]
    fn default_region_is_first() {
        assert_eq!(resolver().default_region("Mexico").unwrap(), "Intern 1");
    }

    #[test]
    fn template_without_placeholders_rejected() {
        let sources = SourcesConfig {
            export_url_template: "https://example.test/export?sheet={sheet}".to_string(),
            ..SourcesConfig::default()
        };
        assert!(matches!(
            Resolver::from_sources(&sources),
            Err(DashError::CatalogInvalid(_))
        ));
    }

    #[test]
    fn leads_url_must_be_http() {
        let mut sources = SourcesConfig::default();
        sources
            .leads
            .entry("Mexico".to_string())
            .or_default()
            .insert("Intern 2".to_string(), "ftp://sheets".to_string());
        assert!(matches!(
            Resolver::from_sources(&sources),
            Err(DashError::CatalogInvalid(_))
        ));
    }
}
